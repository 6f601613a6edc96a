use clap::Parser;
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::process::exit;
use tkml::plan::Plan;
use tkml::{BuildOptions, Builder, Driver};

#[derive(Parser)]
#[command(name = "tkml-dump")]
#[command(about = "Print the widget tree a tkml document builds")]
struct Cli {
    /// Markup file to build
    path: PathBuf,

    /// Most verbose log level (off, error, warn, info, debug, trace)
    #[arg(short, long, default_value = "warn")]
    level: LevelFilter,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = SimpleLogger::new().with_level(cli.level).init() {
        eprintln!("could not install logger: {}", e);
    }

    let plan = Plan::shared();
    let root = plan.borrow().root();
    let mut driver = Driver::new(plan.clone(), root);

    let builder = Builder::with_options(BuildOptions {
        verbosity: cli.level,
        ..Default::default()
    });

    let result = builder.build_from_file(&mut driver, &cli.path);
    print!("{}", plan.borrow().render());

    match result {
        Ok(_) => info!("{}: {} identifier(s) declared", cli.path.display(), driver.registry().len()),
        Err(e) => {
            error!("{}", e);
            exit(1);
        },
    }
}
