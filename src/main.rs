//! Circle Sketch CLI - Approximate an image with circles.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;

use circle_sketch::{
    SketchConfig, SketchEngine,
    compute::run_independent,
    io::{load_config, load_target, save_canvas, save_sketch_json},
};

struct Args {
    input: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    figures: Option<usize>,
    evaluations: Option<usize>,
    neighborhood: Option<usize>,
    seed: Option<u64>,
    runs: usize,
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <input> <output> [options]", program);
    eprintln!();
    eprintln!("Given an image, generates a sketch using just circles.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  input                    Path to the image to sketch");
    eprintln!("  output                   Path to save the output image");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -f, --figures N          Maximum number of figures (default: 10)");
    eprintln!("  -e, --evaluations N      Number of sketches to evaluate (default: 100)");
    eprintln!("  -n, --neighborhood N     Neighbors tried before a restart (default: 10)");
    eprintln!("  -s, --seed N             Random seed");
    eprintln!("  -r, --runs N             Independent runs in parallel (default: 1)");
    eprintln!("  -c, --config FILE        JSON configuration (flags override it)");
    eprintln!("      --example            Print an example configuration");
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("Missing value for {}", flag))?;
    value
        .parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, value))
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut parsed = Args {
        input: PathBuf::new(),
        output: PathBuf::new(),
        config: None,
        figures: None,
        evaluations: None,
        neighborhood: None,
        seed: None,
        runs: 1,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-f" | "--figures" => parsed.figures = Some(parse_value(arg, iter.next())?),
            "-e" | "--evaluations" => parsed.evaluations = Some(parse_value(arg, iter.next())?),
            "-n" | "--neighborhood" => parsed.neighborhood = Some(parse_value(arg, iter.next())?),
            "-s" | "--seed" => parsed.seed = Some(parse_value(arg, iter.next())?),
            "-r" | "--runs" => parsed.runs = parse_value(arg, iter.next())?,
            "-c" | "--config" => parsed.config = Some(parse_value(arg, iter.next())?),
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(format!("Unknown option: {}", flag));
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    if positional.len() != 2 {
        return Err("Expected <input> and <output> paths".to_string());
    }
    if parsed.runs == 0 {
        return Err("--runs must be at least 1".to_string());
    }
    parsed.output = positional.pop().unwrap_or_default();
    parsed.input = positional.pop().unwrap_or_default();
    Ok(parsed)
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let argv: Vec<String> = std::env::args().collect();
    let program = argv.first().map(String::as_str).unwrap_or("circle-sketch");

    if argv.iter().any(|a| a == "--example") {
        print_example_config();
        return;
    }

    let args = parse_args(&argv).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage(program);
        std::process::exit(1);
    });

    // Load configuration, then apply flag overrides
    let mut config = match &args.config {
        Some(path) => load_config(path).unwrap_or_else(|e| {
            eprintln!("Error reading config {}: {}", path.display(), e);
            std::process::exit(1);
        }),
        None => SketchConfig::default(),
    };
    if let Some(figures) = args.figures {
        config.max_figures = figures;
    }
    if let Some(evaluations) = args.evaluations {
        config.evaluations = evaluations;
    }
    if let Some(neighborhood) = args.neighborhood {
        config.neighborhood_size = neighborhood;
    }
    if args.seed.is_some() {
        config.random_seed = args.seed;
    }

    let target = load_target(&args.input).unwrap_or_else(|e| {
        eprintln!("Could not load image {}: {}", args.input.display(), e);
        std::process::exit(1);
    });

    println!("Circle Sketch");
    println!("=============");
    println!("Target: {}x{}", target.width(), target.height());
    println!("Algorithm: {:?}", config.algorithm);
    println!("Evaluations: {}", config.evaluations);
    println!("Max figures: {}", config.max_figures);
    println!("Neighborhood: {}", config.neighborhood_size);
    println!();

    let result = if args.runs > 1 {
        let base = config.random_seed.unwrap_or_else(rand::random);
        let seeds: Vec<u64> = (0..args.runs as u64).map(|i| base.wrapping_add(i)).collect();
        run_independent(&target, &config, &seeds)
    } else {
        SketchEngine::new(config, &target).map(|mut engine| engine.run())
    };
    let result = result.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = save_canvas(&args.output, &result.canvas) {
        eprintln!("Could not save image {}: {}", args.output.display(), e);
        std::process::exit(1);
    }

    let sketch_path = args.output.with_extension("json");
    if let Err(e) = save_sketch_json(&sketch_path, &result.sketch) {
        eprintln!("Could not save sketch {}: {}", sketch_path.display(), e);
        std::process::exit(1);
    }

    println!("Score: {:.4}", result.score);
    println!("Seed: {}", result.seed);
    println!("Stats: {}", result.stats);
    println!("Wrote {} and {}", args.output.display(), sketch_path.display());
}

fn print_example_config() {
    let config = SketchConfig {
        random_seed: Some(42),
        ..Default::default()
    };

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
