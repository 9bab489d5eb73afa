use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use atlas_pager_core::config::SortOrder;
use atlas_pager_core::{
    LayoutItem, PagerConfig, Rect, merged, pack_layout, pack_layouts, validate_source_rect,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "atlas-pager",
    about = "Allocate rectangles across texture atlas pages",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack a rectangle list and print the layout as JSON
    Pack(PackArgs),
    /// Merge overlapping rectangles and print the result
    Merge(MergeArgs),
    /// Pack random rectangles and print time + occupancy
    Bench(BenchArgs),
}

#[derive(Args, Debug, Clone)]
struct PagerArgs {
    /// Page width
    #[arg(long, default_value_t = 2048, help_heading = "Pages")]
    page_width: i32,
    /// Page height
    #[arg(long, default_value_t = 2048, help_heading = "Pages")]
    page_height: i32,
    /// Margin reserved right of and below each placement
    #[arg(long, default_value_t = 1, help_heading = "Pages")]
    padding: i32,
    /// Pixels shared by neighbouring fragments of oversized rectangles
    #[arg(long, default_value_t = 2, help_heading = "Pages")]
    fragment_overlap: i32,
    /// Largest rectangle placed whole, as WxH (defaults to the page size)
    #[arg(long, value_parser = parse_size, help_heading = "Pages")]
    max_size: Option<(i32, i32)>,
    /// Merge overlapping source regions before packing
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    merge_overlapping: bool,
    /// Sort order: area_desc|max_side_desc|height_desc|width_desc|none
    #[arg(long, default_value = "area_desc", help_heading = "Layout")]
    sort_order: String,
    /// Pack independent sets in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    parallel: bool,
    /// YAML config file path (overrides the options above)
    #[arg(long, help_heading = "Layout")]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    /// JSON or YAML file with `items` (or `sets` of items)
    input: PathBuf,
    #[command(flatten)]
    pager: PagerArgs,
    /// Print the merged configuration and exit
    #[arg(long, default_value_t = false, help_heading = "Output")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Output")]
    print_config_format: String,
    /// Compact JSON instead of pretty-printed
    #[arg(long, default_value_t = false, help_heading = "Output")]
    compact: bool,
}

#[derive(Parser, Debug, Clone)]
struct MergeArgs {
    /// JSON or YAML file with `items`
    input: PathBuf,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Number of rectangles
    #[arg(long, default_value_t = 1000)]
    count: usize,
    /// Smallest side
    #[arg(long, default_value_t = 8)]
    min_side: i32,
    /// Largest side
    #[arg(long, default_value_t = 128)]
    max_side: i32,
    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[command(flatten)]
    pager: PagerArgs,
}

#[derive(Debug, Deserialize)]
struct ItemSpec {
    key: String,
    #[serde(default)]
    x: i32,
    #[serde(default)]
    y: i32,
    w: i32,
    h: i32,
}

impl From<ItemSpec> for LayoutItem<String> {
    fn from(s: ItemSpec) -> Self {
        LayoutItem {
            key: s.key,
            rect: Rect::new(s.x, s.y, s.w, s.h),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct InputFile {
    #[serde(default)]
    items: Vec<ItemSpec>,
    #[serde(default)]
    sets: Vec<Vec<ItemSpec>>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args),
        Commands::Merge(args) => run_merge(args),
        Commands::Bench(args) => run_bench(args),
    }
}

fn run_pack(args: &PackArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args.pager)?;

    if args.print_config {
        match args.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let input = read_input(&args.input)?;
    let value = pack_input(input, &cfg)?;

    let text = if args.compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    println!("{}", text);
    Ok(())
}

fn run_merge(args: &MergeArgs) -> anyhow::Result<()> {
    let input = read_input(&args.input)?;
    let out = merge_input(&input)?;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn pack_input(input: InputFile, cfg: &PagerConfig) -> anyhow::Result<serde_json::Value> {
    if !input.items.is_empty() && !input.sets.is_empty() {
        anyhow::bail!("input has both `items` and `sets`; use one of them");
    }
    if input.sets.is_empty() {
        let items: Vec<LayoutItem<String>> = input.items.into_iter().map(Into::into).collect();
        info!(count = items.len(), "loaded items");
        let layout = pack_layout(items, cfg)?;
        info!(
            pages = layout.stats.num_pages,
            fragment_pages = layout.stats.num_fragment_pages,
            used_area = layout.stats.used_area,
            total_area = layout.stats.total_page_area,
            occupancy = format!("{:.2}%", layout.stats.occupancy * 100.0),
            "stats"
        );
        Ok(atlas_pager_core::to_json(&layout))
    } else {
        let sets: Vec<Vec<LayoutItem<String>>> = input
            .sets
            .into_iter()
            .map(|s| s.into_iter().map(Into::into).collect())
            .collect();
        info!(sets = sets.len(), "loaded item sets");
        let layouts = pack_layouts(sets, cfg)?;
        for (i, l) in layouts.iter().enumerate() {
            info!(set = i, "{}", l.stats.summary());
        }
        Ok(serde_json::Value::Array(
            layouts.iter().map(atlas_pager_core::to_json).collect(),
        ))
    }
}

fn merge_input(input: &InputFile) -> anyhow::Result<Vec<Rect>> {
    if !input.sets.is_empty() {
        warn!(sets = input.sets.len(), "merge reads `items` only; ignoring `sets`");
    }
    let mut rects = Vec::with_capacity(input.items.len());
    for s in &input.items {
        let r = Rect::new(s.x, s.y, s.w, s.h);
        validate_source_rect(&r).with_context(|| format!("item {}", s.key))?;
        rects.push(r);
    }
    let out = merged(&rects);
    info!(before = rects.len(), after = out.len(), "merged");
    Ok(out)
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    if b.min_side <= 0 || b.max_side < b.min_side {
        anyhow::bail!("invalid side range: {}..={}", b.min_side, b.max_side);
    }
    let cfg = build_config(&b.pager)?;
    let mut rng = rand::rngs::StdRng::seed_from_u64(b.seed);
    let items: Vec<LayoutItem<String>> = (0..b.count)
        .map(|i| LayoutItem {
            key: format!("r{}", i),
            rect: Rect::sized(
                rng.gen_range(b.min_side..=b.max_side),
                rng.gen_range(b.min_side..=b.max_side),
            ),
        })
        .collect();
    debug!(count = items.len(), seed = b.seed, "generated rectangles");

    let start = Instant::now();
    let layout = pack_layout(items, &cfg)?;
    let dur = start.elapsed();
    println!(
        "pages={} occupancy={:.2}% time={}",
        layout.stats.num_pages,
        layout.stats.occupancy * 100.0,
        fmt_dur(dur)
    );
    Ok(())
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn read_input(path: &Path) -> anyhow::Result<InputFile> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "yaml" | "yml"))
        .unwrap_or(false);
    let input = if is_yaml {
        serde_yaml::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    } else {
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    };
    Ok(input)
}

fn build_config(args: &PagerArgs) -> anyhow::Result<PagerConfig> {
    let cfg = PagerConfig {
        page_width: args.page_width,
        page_height: args.page_height,
        padding: args.padding,
        fragment_overlap: args.fragment_overlap,
        max_size: args.max_size,
        merge_overlapping: args.merge_overlapping,
        sort_order: parse_sort_order(&args.sort_order)?,
        parallel: args.parallel,
    };
    // Config file sets options en bloc over the CLI values
    let cfg = if let Some(path) = &args.config {
        let file =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        y.into_pager_config(cfg)?
    } else {
        cfg
    };
    cfg.validate()?;
    Ok(cfg)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    page_width: Option<i32>,
    page_height: Option<i32>,
    padding: Option<i32>,
    fragment_overlap: Option<i32>,
    max_size: Option<(i32, i32)>,
    merge_overlapping: Option<bool>,
    sort_order: Option<String>,
    parallel: Option<bool>,
}

impl YamlConfig {
    fn into_pager_config(self, mut cfg: PagerConfig) -> anyhow::Result<PagerConfig> {
        if let Some(v) = self.page_width {
            cfg.page_width = v;
        }
        if let Some(v) = self.page_height {
            cfg.page_height = v;
        }
        if let Some(v) = self.padding {
            cfg.padding = v;
        }
        if let Some(v) = self.fragment_overlap {
            cfg.fragment_overlap = v;
        }
        if let Some(v) = self.max_size {
            cfg.max_size = Some(v);
        }
        if let Some(v) = self.merge_overlapping {
            cfg.merge_overlapping = v;
        }
        if let Some(v) = self.sort_order {
            cfg.sort_order = parse_sort_order(&v)?;
        }
        if let Some(v) = self.parallel {
            cfg.parallel = v;
        }
        Ok(cfg)
    }
}

fn parse_sort_order(s: &str) -> anyhow::Result<SortOrder> {
    s.parse::<SortOrder>()
        .map_err(|_| anyhow::anyhow!("unknown sort order: {}", s))
}

fn parse_size(s: &str) -> Result<(i32, i32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got {}", s))?;
    let w = w.trim().parse::<i32>().map_err(|e| e.to_string())?;
    let h = h.trim().parse::<i32>().map_err(|e| e.to_string())?;
    Ok((w, h))
}
