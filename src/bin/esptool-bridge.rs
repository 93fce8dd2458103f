use clap::Parser;
use esptool_bridge::{run, tool::EspTool, Config, ExecutionContext};
use log::debug;
use miette::Result;

#[derive(Debug, Parser)]
#[command(about, version)]
struct Cli {
    /// Serial port connected to the target device
    #[arg(short, long, env = "ESPTOOL_PORT")]
    port: Option<String>,

    /// Baud rate at which to flash the target device
    #[arg(short, long, env = "ESPTOOL_BAUD")]
    baud: Option<u32>,

    /// Command used to launch the flashing tool, e.g. "python -m esptool"
    #[arg(long)]
    tool: Option<String>,

    /// Arguments forwarded to esptool, e.g. `flash_id`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    arguments: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    debug!("{:#?}", cli);

    let config = Config::load()?;

    let tool = match &cli.tool {
        Some(spec) => EspTool::from_command_line(spec),
        None => EspTool::from_config(&config),
    };

    let mut ctx = ExecutionContext::new();
    if let Some(port) = cli.port {
        ctx = ctx.with_port(port);
    }
    if let Some(baud) = cli.baud.or(config.baud) {
        ctx = ctx.with_baud(baud);
    }

    // The result string itself carries success or failure; the exit status
    // only reflects whether the bridge ran at all.
    let outcome = run(&tool, ctx, &cli.arguments.join(" "));
    println!("{outcome}");

    Ok(())
}
