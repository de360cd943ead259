//! tipsy-scene - Build frame interpolation scenes from tipsy snapshots.

use std::env;
use std::path::Path;
use std::process;

use tipsy_scene::prelude::*;
use tipsy_scene::scene::manifest::{read_file_list, sources_from_paths};
use tipsy_scene::scene::output::{write_scene, write_scene_file, write_scene_json, DEFAULT_SCENE_FILE};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the log filter.
const LOG_ENV: &str = "TIPSY_LOG";

/// Global flags, parsed before the command.
struct Options {
    log_level: &'static str,
    codec: CodecOptions,
    use_mmap: bool,
    json: bool,
    output: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            log_level: "info",
            codec: CodecOptions::default(),
            use_mmap: true,
            json: false,
            output: None,
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    // Parse global flags
    let mut opts = Options::default();
    let mut filtered_args: Vec<&str> = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => opts.log_level = "debug",
            "-vv" | "--trace" => opts.log_level = "trace",
            "-q" | "--quiet" => opts.log_level = "error",
            "--no-pad" => opts.codec.has_padding = false,
            "--native" => opts.codec.swap_endian = false,
            "--no-mmap" => opts.use_mmap = false,
            "-j" | "--json" => opts.json = true,
            "-o" | "--output" => match iter.next() {
                Some(path) => opts.output = Some(path.clone()),
                None => fail_usage("missing value for --output", "tipsy-scene scene ... -o <file>"),
            },
            _ => filtered_args.push(arg.as_str()),
        }
    }

    init_logging(opts.log_level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        // Scene command - build interpolation list
        "scene" | "s" => {
            if filtered_args.len() < 4 {
                fail_usage(
                    "missing arguments",
                    "tipsy-scene scene <filelist> <snapshot_name> <n_frames>",
                );
            }
            cmd_scene(filtered_args[1], filtered_args[2], filtered_args[3], &opts)
        }

        // Info command - print headers
        "info" | "i" => {
            if filtered_args.len() < 2 {
                fail_usage("missing file argument", "tipsy-scene info <file>...");
            }
            cmd_info(&filtered_args[1..], &opts)
        }

        // Copy command - full read and re-write
        "copy" | "c" => {
            if filtered_args.len() < 3 {
                fail_usage("missing arguments", "tipsy-scene copy <input> <output>");
            }
            cmd_copy(filtered_args[1], filtered_args[2], &opts)
        }

        "version" | "-V" | "--version" => {
            print_version();
            Ok(())
        }

        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!();
            print_help();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn fail_usage(msg: &str, usage: &str) -> ! {
    eprintln!("Error: {}", msg);
    eprintln!("Usage: {}", usage);
    process::exit(1);
}

fn print_version() {
    println!(
        "tipsy-scene {} (built {} {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("TIPSY_BUILD_DATE").unwrap_or("unknown"),
        option_env!("TIPSY_BUILD_TIME").unwrap_or("unknown"),
    );
}

fn print_help() {
    println!("tipsy-scene - tipsy snapshot scene generator");
    println!();
    println!("USAGE:");
    println!("    tipsy-scene [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    s, scene <filelist> <snapshot_name> <n_frames>");
    println!("                                  Write interpolation scene for n_frames");
    println!("    i, info  <file>...            Show snapshot headers");
    println!("    c, copy  <in> <out>           Read a snapshot fully and write it back out");
    println!("    version                       Show version");
    println!("    h, help                       Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -o, --output <file>  Scene output path (default: {})", DEFAULT_SCENE_FILE);
    println!("    -j, --json           Write scene as JSON");
    println!("    --no-pad             Header has no trailing pad word");
    println!("    --native             Files use host byte order (default: swapped)");
    println!("    --no-mmap            Use buffered reads instead of memory mapping");
    println!("    -v, --verbose        Show debug output");
    println!("    -vv, --trace         Show trace output (every frame)");
    println!("    -q, --quiet          Only show errors");
    println!();
    println!("EXAMPLES:");
    println!("    tipsy-scene scene files.txt cosmo 240           # writes {}", DEFAULT_SCENE_FILE);
    println!("    tipsy-scene scene files.txt cosmo 240 -o -      # print scene to stdout");
    println!("    tipsy-scene info cosmo.00128 cosmo.00256");
    println!();
    println!("NOTES:");
    println!("    - {} overrides the log filter (e.g. {}=tipsy_scene=trace)", LOG_ENV, LOG_ENV);
    println!("    - Snapshot ids are the part of each path after '<snapshot_name>.'");
    println!("    - Snapshots must be listed in ascending time order");
}

fn cmd_scene(filelist: &str, snapshot_name: &str, frames: &str, opts: &Options) -> Result<()> {
    let frame_count: i64 = frames
        .parse()
        .map_err(|_| Error::invalid_arg(format!("frame count '{}' is not an integer", frames)))?;
    let frame_count = usize::try_from(frame_count)
        .map_err(|_| Error::invalid_arg(format!("frame count must be positive, got {}", frame_count)))?;

    info!(frames = frame_count, filelist, "producing scene");

    let paths = read_file_list(filelist)?;
    for p in &paths {
        debug!(path = %p, "input");
    }
    let sources = sources_from_paths(&paths, snapshot_name)?;
    let timeline = load_timeline(&sources, opts.codec)?;
    for entry in timeline.iter() {
        debug!(id = %entry.id, time = entry.time, "snapshot");
    }

    let config = SceneConfig::new(frame_count).with_trace_frames(opts.log_level == "trace");
    let frames = SceneGenerator::new(config).generate(&timeline)?;

    match opts.output.as_deref() {
        Some("-") => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            if opts.json {
                write_scene_json(&mut out, &frames)?;
            } else {
                write_scene(&mut out, &frames)?;
            }
        }
        path => {
            let path = path.unwrap_or(DEFAULT_SCENE_FILE);
            write_scene_file(path, &frames, opts.json)?;
            info!(path, frames = frames.len(), "wrote scene");
        }
    }
    Ok(())
}

fn cmd_info(files: &[&str], opts: &Options) -> Result<()> {
    for file in files {
        let mut snap = SnapshotFile::open_opts(file, opts.codec, opts.use_mmap)?;
        let header = snap.read_header()?;
        println!("{}", file);
        println!("  {}", header);
        if !header.counts_consistent() {
            println!("  warning: nbodies != ngas + ndark + nstar");
        }
        println!("  file size: {} bytes", snap.size());
    }
    Ok(())
}

fn cmd_copy(input: &str, output: &str, opts: &Options) -> Result<()> {
    if Path::new(input) == Path::new(output) {
        return Err(Error::invalid_arg("input and output must differ"));
    }
    let mut snap = SnapshotFile::open_opts(input, opts.codec, opts.use_mmap)?;
    let count = snap.read_all()?.len();
    snap.write_opts(output, opts.codec)?;
    info!(input, output, particles = count, "copied snapshot");
    Ok(())
}
