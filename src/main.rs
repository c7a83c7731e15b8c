use clap::{Parser, Subcommand};
use promptcraft::{
    logger::{self, LogLevel, LoggerConfig},
    placeholder, ArtStyle, AspectRatio, BatchEntry, Clipboard, Config, DetailLevel,
    DirectorySaver, GenAiClient, GenerationOptions, GenerationOutcome, Locale, ParsedPromptRecord,
    PromptOptions, ProviderKind, Quality, Style, WriterClipboard, validate_idea,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "promptcraft")]
#[command(about = "Generate AI art prompts and images from short ideas with Google Gemini")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Message language (en, vi)
    #[arg(long, global = true)]
    locale: Option<Locale>,

    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Also append logs to this file
    #[arg(long, global = true)]
    log_file: Option<String>,
}

#[derive(clap::Args)]
struct ImageArgs {
    /// Visual style (photorealistic, artistic, anime, cartoon, minimalist, fantasy, or any name)
    #[arg(long, default_value = "photorealistic")]
    style: String,

    /// Quality (high, standard, low)
    #[arg(long, default_value = "high")]
    quality: Quality,

    /// Aspect ratio (1:1, 16:9, 9:16, 3:4)
    #[arg(long, default_value = "1:1")]
    aspect_ratio: AspectRatio,

    /// Things the image should avoid
    #[arg(long)]
    negative: Option<String>,

    /// Image provider (gemini, imagen3)
    #[arg(long)]
    provider: Option<ProviderKind>,

    /// Model used for native generation
    #[arg(long)]
    model: Option<String>,

    /// Directory to save images into
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Print the full outcome as JSON
    #[arg(long)]
    json: bool,
}

impl ImageArgs {
    fn options(&self) -> GenerationOptions {
        let mut options = GenerationOptions::new()
            .with_style(Style::from(self.style.as_str()))
            .with_quality(self.quality)
            .with_aspect_ratio(self.aspect_ratio);
        if let Some(negative) = &self.negative {
            options = options.with_negative_prompt(negative.as_str());
        }
        options
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an image from an idea
    Image {
        idea: String,

        #[command(flatten)]
        args: ImageArgs,
    },

    /// Generate images for several ideas, one after another
    Batch {
        ideas: Vec<String>,

        /// Read ideas from a file, one per line
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Pause between requests in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        #[command(flatten)]
        args: ImageArgs,
    },

    /// Expand an idea into detailed art prompts
    Prompts {
        idea: String,

        /// realistic, anime, cartoon, oil-painting, watercolor, digital-art, fantasy, cyberpunk, minimalist, vintage
        #[arg(long, default_value = "realistic")]
        art_style: ArtStyle,

        /// basic, detailed, very-detailed, ultra-detailed
        #[arg(long, default_value = "detailed")]
        detail: DetailLevel,

        #[arg(long, default_value = "1:1")]
        aspect_ratio: AspectRatio,

        /// Number of prompts (1-5)
        #[arg(short, long, default_value = "3")]
        count: u8,

        /// Print only the copy text of this prompt
        #[arg(long)]
        copy: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Render the offline placeholder SVG for an idea
    Placeholder {
        idea: String,

        #[arg(long, default_value = "photorealistic")]
        style: String,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that the configured API key works
    Validate,

    /// List models, providers, styles and quality levels
    Models,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();

    let mut log_config = LoggerConfig::new();
    if cli.json_logs {
        log_config = log_config.with_json_output(true).with_colors(false);
    }
    if cli.verbose {
        log_config = log_config.with_level(LogLevel::Debug);
    }
    if let Some(path) = &cli.log_file {
        log_config = log_config.with_file_output(path);
    }
    logger::init_with_config(log_config)?;

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    if !dotenv_loaded {
        log::debug!("No .env file found, using system environment variables");
    }

    let mut config = Config::from_env();
    if let Some(locale) = cli.locale {
        config.image = config.image.with_locale(locale);
    }
    let locale = config.image.locale;

    match cli.command {
        Commands::Image { idea, args } => {
            validate_idea(&idea)?;
            let client = GenAiClient::new(image_config(config, &args))?;
            let outcome = client.image().generate(&idea, &args.options()).await;
            report_outcome(&client, &outcome, &args, &idea).await?;
            if !outcome.succeeded {
                std::process::exit(1);
            }
        }
        Commands::Batch {
            mut ideas,
            file,
            delay_ms,
            args,
        } => {
            if let Some(path) = file {
                let contents = tokio::fs::read_to_string(&path).await?;
                ideas.extend(
                    contents
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(String::from),
                );
            }
            if ideas.is_empty() {
                return Err("No ideas given".into());
            }

            let mut options = args.options();
            if let Some(ms) = delay_ms {
                options = options.with_delay(Duration::from_millis(ms));
            }

            let client = GenAiClient::new(image_config(config, &args))?;
            let results: Vec<BatchEntry> = client.image().generate_batch(&ideas, &options).await;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for (index, entry) in results.iter().enumerate() {
                    println!("#{} {}", index + 1, entry.idea);
                    let name = format!("{}-{}", index + 1, entry.idea);
                    report_outcome(&client, &entry.outcome, &args, &name).await?;
                }
            }
        }
        Commands::Prompts {
            idea,
            art_style,
            detail,
            aspect_ratio,
            count,
            copy,
            json,
        } => {
            let options = PromptOptions::new()
                .with_art_style(art_style)
                .with_detail_level(detail)
                .with_aspect_ratio(aspect_ratio)
                .with_count(count);

            let client = GenAiClient::new(config)?;
            let records = match client.prompts().generate_prompts(&idea, &options).await {
                Ok(records) => records,
                Err(e) => {
                    log::error!("Prompt generation failed: {}", e);
                    eprintln!("{}", e.describe(locale));
                    std::process::exit(1);
                }
            };

            if let Some(ordinal) = copy {
                let record = records
                    .iter()
                    .find(|r| r.ordinal == ordinal)
                    .ok_or_else(|| format!("No prompt #{}", ordinal))?;
                WriterClipboard::new(std::io::stdout())
                    .copy_text_to_clipboard(&record.copy_all_text())
                    .await?;
            } else if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                records.iter().for_each(print_record);
            }
        }
        Commands::Placeholder {
            idea,
            style,
            output,
        } => {
            let svg = placeholder::synthesize(&idea, &Style::from(style));
            match output {
                Some(path) => {
                    tokio::fs::write(&path, svg).await?;
                    log::info!("Wrote placeholder to {}", path.display());
                }
                None => println!("{}", svg),
            }
        }
        Commands::Validate => {
            let client = GenAiClient::new(config)?;
            let check = client.image().validate_credential().await;
            println!("{}", check.message);
            if !check.valid {
                std::process::exit(1);
            }
        }
        Commands::Models => {
            let client = GenAiClient::new(config)?;
            println!("Models:");
            for model in client.available_models() {
                println!(
                    "  {:<45} {:<30} {:<8} {}",
                    model.id,
                    model.name,
                    model.provider.as_str(),
                    model.description
                );
            }
            println!("\nProviders:");
            for provider in client.available_providers() {
                println!("  {:<10} {}", provider.id, provider.description);
            }
            println!("\nStyles:");
            for style in client.available_styles() {
                println!("  {:<16} {}", style.id, style.description);
            }
            println!("\nQuality:");
            for quality in client.quality_options() {
                println!("  {:<10} {}", quality.id, quality.description);
            }
        }
    }

    Ok(())
}

fn image_config(mut config: Config, args: &ImageArgs) -> Config {
    if let Some(provider) = args.provider {
        config.image = config.image.with_provider(provider);
    }
    if let Some(model) = &args.model {
        config.image = config.image.with_model(model.as_str());
    }
    logger::log_config_info(&config);
    config
}

async fn report_outcome(
    client: &GenAiClient,
    outcome: &GenerationOutcome,
    args: &ImageArgs,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    }

    if !outcome.succeeded {
        if let Some(description) = &outcome.error_description {
            eprintln!("{}", description);
        }
        return Ok(());
    }

    let saver = args.out.as_ref().map(DirectorySaver::new);
    if let Some(saver) = &saver {
        log::debug!("Saving images to {}", saver.dir().display());
    }
    for (index, image) in outcome.images.iter().enumerate() {
        let file_name = if outcome.images.len() > 1 {
            format!("{}-{}", name, index + 1)
        } else {
            name.to_string()
        };

        match &saver {
            Some(saver) => {
                let path = client.image().download_image(saver, image, &file_name).await?;
                if !args.json {
                    println!("{:?} image saved to {}", image.strategy, path.display());
                }
            }
            None if !args.json => {
                let url = image.url().unwrap_or_default();
                let shown: String = url.chars().take(96).collect();
                println!("{:?} image: {}", image.strategy, shown);
            }
            None => {}
        }

        if let Some(description) = &image.description {
            if !args.json {
                println!("{}", description);
            }
        }
    }

    Ok(())
}

fn print_record(record: &ParsedPromptRecord) {
    println!("Prompt {}:", record.ordinal);
    println!("  {}", record.prompt_text);
    if !record.localized_description.is_empty() {
        println!("Description:\n  {}", record.localized_description);
    }
    if !record.negative_prompt.is_empty() {
        println!("Negative Prompt:\n  {}", record.negative_prompt);
    }
    println!();
}
