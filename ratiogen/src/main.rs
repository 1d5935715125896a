use arch::{EventTable, Target};
use clap::Parser;
use color_print::cprintln;
use ratiogen::emit::{setup_name, write_output};
use ratiogen::msg::{self, Level, Msg};
use ratiogen::util::display::summary;
use ratiogen::{translate, Config, Error, Source};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Target architecture of the event map (x86 or arm)
    #[clap(short = 'T', long, value_parser = Target::parse)]
    target: Target,

    /// Input ratios file
    #[clap(short = 'I', long)]
    input_file: String,

    /// Event map file
    #[clap(short = 'M', long)]
    map_file: String,

    /// Output C++ file
    #[clap(short = 'O', long)]
    output_file: String,

    /// Prefix of the setup routine (default: from the input file name)
    #[clap(short, long)]
    name: Option<String>,

    /// YAML file overriding the generator's fixed strings
    #[clap(short, long)]
    config: Option<String>,

    /// Print tables of the extracted definitions
    #[clap(short, long)]
    verbose: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    println!("Ratio Translator");

    if let Err(err) = run(&args) {
        let mut text = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            text.push_str(&format!(": {cause}"));
            source = std::error::Error::source(cause);
        }
        Msg::error(text).print();
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    println!("1. Read Files");
    let config = match &args.config {
        Some(path) => {
            println!("  < {}", path);
            Config::load(path)?
        }
        None => Config::default(),
    };

    println!("  < {}", args.input_file);
    let source = Source::read(&args.input_file)?;

    println!("  < {} ({})", args.map_file, args.target);
    let map = std::fs::read_to_string(&args.map_file)
        .map_err(|e| Error::FileRead(args.map_file.clone(), e))?;
    let (events, issues) = EventTable::load(args.target, &map)?;
    for issue in &issues {
        Msg::warn(&issue.reason)
            .at(&args.map_file, issue.line, &issue.raw)
            .print();
    }
    log::info!("{} events loaded", events.len());

    println!("2. Translate");
    let unit = translate(&source, &events, &config)?;
    msg::dump(&unit.diagnostics);

    println!("3. Emit");
    let setup = args
        .name
        .clone()
        .unwrap_or_else(|| setup_name(&args.input_file));
    let text = unit.emit(&events, &config, &setup);
    println!("  > {}", args.output_file);
    write_output(&args.output_file, &text)?;

    let warnings = issues.len() + msg::count(&unit.diagnostics, Level::Warn);
    if warnings > 0 {
        cprintln!("<yellow,bold>{}</> warning(s)", warnings);
    }

    if args.verbose {
        summary(&unit, &events);
    }
    Ok(())
}
