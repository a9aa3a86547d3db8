use clap::{Args, Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use torricelli_engine::constants::*;
use torricelli_engine::{
    compute_scenario, run_sweep, sweep_values, CsvReport, CurveSink, JsonReport, ScenarioInputs, SvgChartSink,
    SweepParameter, SweepRow, TableReport,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "torricelli")]
#[command(version = "0.1.0")]
#[command(about = "Tank draining and water jet trajectory calculator (Torricelli's law)", long_about = None)]
struct Cli {
    /// Log debug details to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute one draining scenario
    Scenario {
        #[command(flatten)]
        params: ScenarioArgs,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,

        /// Print every time sample in table mode
        #[arg(long)]
        full: bool,

        /// Also write the four charts as SVG files into this directory
        #[arg(long)]
        plot_dir: Option<PathBuf>,
    },

    /// Vary one parameter and compare the resulting summaries
    Sweep {
        #[command(flatten)]
        params: ScenarioArgs,

        /// Parameter to vary (container-diameter, orifice-diameter, orifice-height, max-time)
        #[arg(short = 'p', long)]
        parameter: String,

        /// First value (defaults to the parameter's lower limit)
        #[arg(long)]
        from: Option<f64>,

        /// Last value (defaults to the parameter's upper limit)
        #[arg(long)]
        to: Option<f64>,

        /// Number of values
        #[arg(short = 'n', long, default_value = "10")]
        steps: usize,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Display model information
    Info,
}

#[derive(Args)]
struct ScenarioArgs {
    /// JSON file with scenario parameters; flags below override it
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Container diameter (m)
    #[arg(short = 'D', long)]
    container_diameter: Option<f64>,

    /// Orifice diameter (m)
    #[arg(short = 'd', long)]
    orifice_diameter: Option<f64>,

    /// Orifice height above the ground (m)
    #[arg(short = 'H', long)]
    orifice_height: Option<f64>,

    /// Simulated duration (s)
    #[arg(short = 't', long)]
    max_time: Option<f64>,
}

impl ScenarioArgs {
    // defaults -> config file -> flags
    fn resolve(&self) -> Result<ScenarioInputs, Box<dyn Error>> {
        let mut inputs = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
                debug!(path = %path.display(), "loaded scenario config");
                ScenarioInputs::from_json(&text)?
            }
            None => ScenarioInputs::default(),
        };

        if let Some(v) = self.container_diameter {
            inputs.container_diameter = v;
        }
        if let Some(v) = self.orifice_diameter {
            inputs.orifice_diameter = v;
        }
        if let Some(v) = self.orifice_height {
            inputs.orifice_height = v;
        }
        if let Some(v) = self.max_time {
            inputs.max_time = v;
        }
        Ok(inputs)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("TORRICELLI_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Scenario { params, output, full, plot_dir } => {
            let inputs = params.resolve()?;
            let result = compute_scenario(inputs)?;

            let stdout = io::stdout();
            match output {
                OutputFormat::Table => {
                    let mut report = TableReport::new(stdout.lock(), full);
                    result.publish_report(&mut report)?;
                    report.finish()?;
                }
                OutputFormat::Json => {
                    let mut report = JsonReport::new();
                    result.publish_report(&mut report)?;
                    println!("{}", report.to_json_pretty()?);
                }
                OutputFormat::Csv => {
                    let mut report = CsvReport::new(stdout.lock());
                    result.publish_report(&mut report)?;
                    report.finish()?;
                }
            }

            if let Some(dir) = plot_dir {
                let mut sink = SvgChartSink::new(&dir)?;
                for dataset in result.curves.iter() {
                    sink.curve(dataset)?;
                }
                info!(count = sink.written().len(), dir = %dir.display(), "charts written");
                eprintln!("Wrote {} charts to {}", sink.written().len(), dir.display());
            }
        },

        Commands::Sweep { params, parameter, from, to, steps, output } => {
            let base = params.resolve()?;
            let parameter = SweepParameter::from_str(&parameter)
                .ok_or_else(|| format!("Invalid sweep parameter: {}", parameter))?;

            let (lower, upper) = parameter.limits();
            let values = sweep_values(parameter, from.unwrap_or(lower), to.unwrap_or(upper), steps);
            let rows = run_sweep(&base, parameter, &values)?;

            display_sweep_results(parameter, &rows, output)?;
        },

        Commands::Info => {
            println!("╔════════════════════════════════════════════╗");
            println!("║         TORRICELLI ENGINE v0.1.0           ║");
            println!("╠════════════════════════════════════════════╣");
            println!("║ Cylindrical tank draining through a small  ║");
            println!("║ orifice, and the jet it throws.            ║");
            println!("╠════════════════════════════════════════════╣");
            println!("║ Model:                                     ║");
            println!("║ • h(t) = sqrt(max(h0² - 2gat/A, 0))        ║");
            println!("║ • v = sqrt(2g·head)  (Torricelli)          ║");
            println!("║ • y(x) = -g·x² / (2v²)                     ║");
            println!("║ Initial level h0 = {:>5.1} m                 ║", INITIAL_WATER_HEIGHT_M);
            println!("║ Gravity g       = {:>5.2} m/s²              ║", G_ACCEL_MPS2);
            println!("╚════════════════════════════════════════════╝");
        }
    }

    Ok(())
}

fn display_sweep_results(
    parameter: SweepParameter,
    rows: &[SweepRow],
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(out, "╔══════════════════════════════════════════════════════════════════╗")?;
            writeln!(out, "║ PARAMETER SWEEP: {:<48}║", parameter.to_string())?;
            writeln!(out, "╠════════════╤════════════╤════════════╤════════════╤══════════════╣")?;
            writeln!(
                out,
                "║ {:>10} │ {:>10} │ {:>10} │ {:>10} │ {:>12} ║",
                format!("Value ({})", parameter.unit()),
                "v0 (m/s)",
                "Range (m)",
                "Q (l/s)",
                "Empty at (s)"
            )?;
            writeln!(out, "╟────────────┼────────────┼────────────┼────────────┼──────────────╢")?;
            for row in rows {
                let end = row
                    .summary
                    .outflow_end_time
                    .map(|t| format!("{:.1}", t))
                    .unwrap_or_else(|| "-".to_string());
                writeln!(
                    out,
                    "║ {:>10.3} │ {:>10.2} │ {:>10.2} │ {:>10.3} │ {:>12} ║",
                    row.value,
                    row.summary.exit_velocity,
                    row.summary.max_range,
                    row.summary.flow_rate * CUBIC_METERS_TO_LITERS,
                    end
                )?;
            }
            writeln!(out, "╚════════════╧════════════╧════════════╧════════════╧══════════════╝")?;
        },

        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(rows)?)?;
        },

        OutputFormat::Csv => {
            writeln!(out, "value,exit_velocity,max_range,flow_rate,total_liters,impact_time,outflow_end_time")?;
            for row in rows {
                let s = &row.summary;
                writeln!(
                    out,
                    "{},{:.4},{:.4},{:.6e},{:.2},{:.4},{}",
                    row.value,
                    s.exit_velocity,
                    s.max_range,
                    s.flow_rate,
                    s.total_liters,
                    s.impact_time,
                    s.outflow_end_time.map(|t| format!("{:.2}", t)).unwrap_or_default()
                )?;
            }
        },
    }

    Ok(())
}
