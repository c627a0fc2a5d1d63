use clap::Parser;
use serde_json::json;

use hdfs_conf::config::cluster::ClusterContext;
use hdfs_conf::config::hadoop_config::HadoopConfig;
use hdfs_conf::config::load_report::FileOutcome;
use hdfs_conf::error::Result;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding core-site.xml and hdfs-site.xml; falls back to
    /// HADOOP_CONF_DIR, then $HADOOP_HOME/conf.
    #[arg(short, long, default_value = "")]
    conf_dir: String,

    /// Filesystem name to resolve instead of the configured fs.defaultFS.
    #[arg(short, long, default_value = "")]
    fs: String,

    /// Emit the load report and resolution as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Cli::parse();

    let (config, report) = HadoopConfig::load_with_report(&args.conf_dir);
    for entry in &report.files {
        match &entry.outcome {
            FileOutcome::Loaded { properties } => {
                tracing::info!("{}: {} properties", entry.file, properties)
            }
            FileOutcome::NotFound => tracing::info!("{}: not found", entry.file),
            FileOutcome::ParseError(e) => tracing::warn!("{}: {}", entry.file, e),
        }
    }

    let context = ClusterContext::new();
    let namenodes = context.resolve_namenodes(&config, &args.fs)?;

    if args.json {
        let doc = json!({
            "report": report,
            "default_fs": context.default_fs(),
            "namenodes": namenodes,
        });
        println!("{}", serde_json::to_string_pretty(&doc).unwrap());
    } else {
        println!("default fs: {}", context.default_fs());
        for namenode in &namenodes {
            println!("{}", namenode);
        }
    }

    Ok(())
}
