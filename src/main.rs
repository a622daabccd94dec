use clap::{Parser, Subcommand};
use polyfolio::config::{self, SiteConfig};
use polyfolio::content::{Collection, ContentItem};
use polyfolio::fetch::{DirFetcher, FetchError, Fetcher};
use polyfolio::loader::{LoadError, ManifestLoader};
use polyfolio::locale;
use polyfolio::translate::{self, Translations};
use polyfolio::views::{self, ViewContext};
use polyfolio::{paginate, sanitize};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "polyfolio")]
#[command(version = version_string())]
#[command(about = "Render multilingual editorial content from static JSON manifests")]
#[command(long_about = "\
Render multilingual editorial content from static JSON manifests

The site root is the tree a static file server would expose:

  site/
  ├── config.toml                  # Site config (optional)
  ├── assets/i18n.json             # Translation dictionary (optional)
  ├── settings/en.json             # Per-language settings (optional)
  └── content/
      ├── blog/en/index.json       # { \"posts\":  [ ... ] }
      ├── news/es/index.json       # { \"posts\":  [ ... ] }
      └── gallery/ko/index.json    # { \"albums\": [ ... ] }

`render` runs the full pipeline (load → filter → sort → paginate → markdown
→ sanitize) and prints the resulting markup; `check` validates every
manifest against the publish contract.")]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    site: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a list or detail page to markup on stdout
    Render {
        /// Collection to render: blog, news, or gallery
        #[arg(long)]
        collection: String,
        /// Language (defaults to the configured default language)
        #[arg(long)]
        lang: Option<String>,
        /// List page number, or image page for an album detail
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Render the detail view for this slug instead of the list
        #[arg(long)]
        slug: Option<String>,
        /// Sanitize one manifest body and print it, without page chrome
        #[arg(long)]
        body_only: bool,
    },
    /// Validate manifests against the publish contract
    ///
    /// Published records must carry a non-empty title, date, slug, and the
    /// collection-specific required fields. Drafts are exempt.
    Check,
    /// Resolve locale and routing for a page URL
    ///
    /// Prints the redirect target when the URL lacks a language prefix,
    /// otherwise the detected language; plus the recovered base path when a
    /// script URL is given.
    Locale {
        /// Full page URL (e.g. https://host/es/blog/)
        #[arg(long)]
        url: String,
        /// URL the entry script was loaded from, for base-path recovery
        #[arg(long)]
        script_url: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("error: failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };
    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> ExitCode {
    let config = match config::load_config(&cli.site) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let fetcher: Arc<DirFetcher> = Arc::new(DirFetcher::new(&cli.site));
    let loader = ManifestLoader::new(fetcher.clone());

    match cli.command {
        Commands::Render {
            collection,
            lang,
            page,
            slug,
            body_only,
        } => {
            render(
                &loader,
                fetcher.as_ref(),
                &config,
                &collection,
                lang.as_deref(),
                page,
                slug.as_deref(),
                body_only,
            )
            .await
        }
        Commands::Check => check(&loader, &config).await,
        Commands::Locale { url, script_url } => locale_info(&config, &url, script_url.as_deref()),
    }
}

fn locale_info(config: &SiteConfig, url: &str, script_url: Option<&str>) -> ExitCode {
    let location = match url::Url::parse(url) {
        Ok(location) => location,
        Err(err) => {
            eprintln!("error: invalid url '{url}': {err}");
            return ExitCode::FAILURE;
        }
    };
    match locale::redirect_if_missing_prefix(
        &location,
        &config.languages.supported,
        &config.routing.bypass_segments,
        &config.languages.default,
    ) {
        Some(target) => println!("redirect: {target}"),
        None => {
            let lang = locale::detect_language(
                location.path(),
                &config.languages.supported,
                &config.languages.default,
            );
            println!("language: {lang}");
        }
    }
    if let Some(script_url) = script_url {
        let base = locale::detect_base_path(script_url, &config.routing.entry_script);
        println!("base path: {base}");
    }
    ExitCode::SUCCESS
}

#[allow(clippy::too_many_arguments)]
async fn render(
    loader: &ManifestLoader,
    fetcher: &dyn Fetcher,
    config: &SiteConfig,
    collection: &str,
    lang: Option<&str>,
    page: usize,
    slug: Option<&str>,
    body_only: bool,
) -> ExitCode {
    let Some(collection) = Collection::from_name(collection) else {
        eprintln!("error: unknown collection '{collection}' (expected blog, news, or gallery)");
        return ExitCode::FAILURE;
    };
    let lang = lang.unwrap_or(&config.languages.default).to_string();
    if !config.languages.supported.contains(&lang) {
        eprintln!(
            "error: unsupported language '{lang}' (configured: {})",
            config.languages.supported.join(", ")
        );
        return ExitCode::FAILURE;
    }

    let translations = Translations::load(fetcher, &config.routing.i18n_path).await;
    let ctx = ViewContext {
        base_path: "/",
        lang: &lang,
        translations: &translations,
    };

    let items = match loader.get_collection(collection, &lang).await {
        Ok(items) => items,
        Err(err) => {
            eprintln!("error: {err}");
            println!("{}", views::load_error(&ctx, collection).into_string());
            return ExitCode::FAILURE;
        }
    };

    let markup = match slug {
        None => {
            let slice = paginate::paginate(&items, config.pagination.posts_per_page, page);
            views::list_page(&ctx, collection, &slice)
        }
        Some(slug) => match items.iter().find(|item| item.slug() == slug) {
            None => views::not_found(&ctx, collection),
            Some(item) => {
                if body_only {
                    return print_body(item);
                }
                let detail = match item {
                    ContentItem::Post(post) => views::post_detail(&ctx, post),
                    ContentItem::Album(album) => views::album_detail(
                        &ctx,
                        album,
                        page,
                        config.pagination.album_images_per_page,
                    ),
                };
                let switch_links = translate::resolve_translation_links(
                    loader,
                    collection,
                    &config.languages.supported,
                    &lang,
                    slug,
                    &[("slug".to_string(), slug.to_string())],
                )
                .await;
                let menu = views::language_menu(&ctx, &switch_links);
                maud::html! { (detail) (menu) }
            }
        },
    };

    println!("{}", markup.into_string());
    ExitCode::SUCCESS
}

/// Print one item's sanitized body markup, nothing else. Handy for checking
/// what the sanitizer makes of a specific record.
fn print_body(item: &ContentItem) -> ExitCode {
    let raw = match item {
        ContentItem::Post(post) => match &post.body_html {
            Some(body) if !body.is_empty() => body.clone(),
            _ => polyfolio::markdown::render_markdown(
                post.body_markdown.as_deref().unwrap_or(""),
            ),
        },
        ContentItem::Album(album) => {
            eprintln!("error: '{}' is an album; albums have no body", album.slug);
            return ExitCode::FAILURE;
        }
    };
    println!("{}", sanitize::sanitize_html(&raw));
    ExitCode::SUCCESS
}

async fn check(loader: &ManifestLoader, config: &SiteConfig) -> ExitCode {
    let mut failures: Vec<String> = Vec::new();
    let mut published = 0usize;

    for collection in Collection::ALL {
        for lang in &config.languages.supported {
            let label = format!("{}/{}", collection.name(), lang);
            match loader.load(collection, lang).await {
                Err(LoadError::Fetch(FetchError::NotFound(_))) => {
                    println!("{label}: no manifest, skipped");
                }
                Err(err) => failures.push(format!("{label}: {err}")),
                Ok(items) => {
                    let mut complete = 0usize;
                    for item in items.iter() {
                        if !item.status().is_published() {
                            continue;
                        }
                        published += 1;
                        let missing = item.validate_published();
                        if missing.is_empty() {
                            complete += 1;
                        } else {
                            let name = if item.slug().is_empty() {
                                "(no slug)"
                            } else {
                                item.slug()
                            };
                            failures.push(format!(
                                "{label}/{name}: missing {}",
                                missing.join(", ")
                            ));
                        }
                    }
                    println!("{label}: {complete} published record(s) complete");
                }
            }
        }
    }

    if failures.is_empty() {
        println!("Checked {published} published record(s), all complete");
        ExitCode::SUCCESS
    } else {
        eprintln!("\nPublish contract violations:");
        for failure in &failures {
            eprintln!("- {failure}");
        }
        ExitCode::FAILURE
    }
}
