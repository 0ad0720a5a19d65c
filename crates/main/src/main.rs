use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use assessment_report::layout::Document;
use assessment_report::likert::ResponseScale;
use assessment_report::{
    AssessmentKind, Priority, Recommendation, ReportBuilder, ReportExporter, ReportModel,
};
use clap::{Args, Parser, Subcommand};
use log::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Lays out and renders assessment reports from the command line.
///
/// TrueType fonts are looked up under `assets/fonts` or in the directory named
/// by `ASSESSMENT_REPORT_FONTS_DIR`; without them the builtin Helvetica faces
/// are used.
#[derive(Parser)]
#[command(author, version, about = "Render paginated assessment reports")]
struct Cli {
    #[command(flatten)]
    options: ExportOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ExportOptions {
    /// Response label wording (`agreement` or `maturity`).
    #[arg(long, global = true)]
    scale: Option<ResponseScale>,

    /// Product name used in titles and footers.
    #[arg(long, global = true)]
    product: Option<String>,

    /// Directory holding Roboto-Regular.ttf and Roboto-Bold.ttf.
    #[arg(long, global = true)]
    fonts_dir: Option<PathBuf>,

    /// Draw with the builtin Helvetica faces.
    #[arg(long, global = true)]
    builtin_fonts: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a report model stored as JSON.
    Render {
        input: PathBuf,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Add one outline entry per report section.
        #[arg(long)]
        bookmarks: bool,
    },

    /// Print the page layout of a report model without rendering it.
    Inspect { input: PathBuf },

    /// Render a generated report, or print its model with `--json`.
    Sample {
        #[arg(long, default_value = "shopfloor")]
        kind: AssessmentKind,

        /// Answer given to every question.
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(0..=5))]
        answer: u8,

        #[arg(long, default_value_t = 3)]
        recommendations: usize,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            input,
            out_dir,
            bookmarks,
        } => render(&cli.options, &input, &out_dir, bookmarks),
        Commands::Inspect { input } => inspect(&cli.options, &input),
        Commands::Sample {
            kind,
            answer,
            recommendations,
            out_dir,
            json,
        } => sample(&cli.options, kind, answer, recommendations, &out_dir, json),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn exporter(options: &ExportOptions) -> Result<ReportExporter, Box<dyn Error>> {
    let mut builder = ReportBuilder::from_env();
    if let Some(scale) = options.scale {
        builder = builder.with_response_scale(scale);
    }
    if let Some(product) = &options.product {
        builder = builder.with_product_name(product.clone());
    }
    if let Some(dir) = &options.fonts_dir {
        builder = builder.with_fonts_dir(dir.clone());
    }
    if options.builtin_fonts {
        builder = builder.with_builtin_fonts();
    }
    Ok(builder.build()?)
}

fn load_model(input: &Path) -> Result<ReportModel, Box<dyn Error>> {
    let json = fs::read_to_string(input)
        .map_err(|err| format!("Failed to read {}: {}", input.display(), err))?;
    let model: ReportModel = serde_json::from_str(&json)
        .map_err(|err| format!("Failed to parse {}: {}", input.display(), err))?;
    Ok(model.with_normalized_recommendations())
}

fn render(
    options: &ExportOptions,
    input: &Path,
    out_dir: &Path,
    bookmarks: bool,
) -> Result<(), Box<dyn Error>> {
    let model = load_model(input)?;
    let exporter = exporter(options)?;

    let report = if bookmarks {
        exporter.render_with_bookmarks(&model)?
    } else {
        exporter.render(&model)?
    };

    fs::create_dir_all(out_dir)?;
    let path = report.write_to_dir(out_dir)?;
    println!("{}", path.display());
    Ok(())
}

fn inspect(options: &ExportOptions, input: &Path) -> Result<(), Box<dyn Error>> {
    let model = load_model(input)?;
    let document = exporter(options)?.layout(&model);
    print_document(&document);
    Ok(())
}

fn print_document(document: &Document) {
    println!("{} pages", document.page_count());

    for section in document.sections() {
        println!(
            "section {:<40} page {:>2}  y {:>6.1}",
            section.title,
            section.page + 1,
            section.y
        );
    }

    for page in document.pages() {
        println!("page {} (cursor {:.1})", page.index + 1, page.cursor);
        for card in &page.cards {
            let fragment = card
                .fragment
                .map(|f| format!(" part {}/{}", f.index + 1, f.count))
                .unwrap_or_default();
            println!(
                "  {:?} #{}{}  y {:>6.1}  h {:>6.1}  {} lines",
                card.kind,
                card.sequence + 1,
                fragment,
                card.rect.y,
                card.rect.height,
                card.lines.len()
            );
        }
    }
}

fn sample_recommendations(count: usize) -> Vec<Recommendation> {
    const PRIORITIES: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    (0..count)
        .map(|index| {
            Recommendation::new(
                format!("Recommendation {}", index + 1),
                "Map the current data flows between production lines and planning systems, \
                 then pick one line to pilot real-time monitoring.",
            )
            .with_priority(PRIORITIES[index % PRIORITIES.len()])
            .with_timeline("3-6 months")
            .with_impact("Shorter feedback loops between the floor and management")
        })
        .collect()
}

fn sample(
    options: &ExportOptions,
    kind: AssessmentKind,
    answer: u8,
    recommendations: usize,
    out_dir: &Path,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let answers: BTreeMap<u32, u8> = kind.questions().iter().map(|q| (q.id, answer)).collect();
    let model = ReportModel::from_answers(
        kind,
        &answers,
        "2024-01-15",
        sample_recommendations(recommendations),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&model)?);
        return Ok(());
    }

    let report = exporter(options)?.render(&model)?;
    fs::create_dir_all(out_dir)?;
    let path = report.write_to_dir(out_dir)?;
    info!("Sample {} report has {} pages", kind, report.page_count());
    println!("{}", path.display());
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
