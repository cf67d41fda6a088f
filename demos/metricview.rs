use std::time::Duration;

use tokio::io::AsyncBufReadExt;

fn print_usage() {
    eprintln!("Usage: metricview (agents|metrics|display|tree) [agent...]");
    eprintln!("  reads `<agent> <json payload>` lines from stdin");
    eprintln!("  metrics, display and tree read only from the given agents if any");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(command) = args.next() else {
        print_usage();
        std::process::exit(1);
    };
    let agents: Vec<String> = args.collect();
    let read_timeout = std::env::var("METRICVIEW_READ_TIMEOUT_MS")
        .ok()
        .and_then(|ms| ms.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(5000));

    let (tx, mut source) = metricview::viewer::ChannelSource::channel(64);
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let Some((agent, payload)) = line.split_once(' ') else {
                log::warn!("malformed line: {}", line);
                continue;
            };
            let sample = metricview::msg::Sample::alive(agent, payload.to_string());
            if tx.send(sample).await.is_err() {
                break;
            }
        }
    });

    let mut stdout = std::io::stdout();
    match command.as_str() {
        "agents" | "metrics" => {
            let mut config = metricview::viewer::ViewerConfig::default();
            config.read_timeout = read_timeout;
            if command == "metrics" && !agents.is_empty() {
                config.agents = Some(agents.into_iter().collect());
            }
            let catalog = metricview::viewer::list_metrics(&mut source, &config).await?;
            if command == "agents" {
                catalog.write_agents_to(&mut stdout)?;
            } else {
                catalog.write_to(&mut stdout)?;
            }
        }
        "display" | "tree" => {
            let render_mode = if command == "tree" {
                metricview::viewer::RenderMode::Tree
            } else {
                metricview::viewer::RenderMode::Flat
            };
            let mut builder = metricview::MetricViewer::builder(source)
                .read_timeout(read_timeout)
                .render_mode(render_mode)
                .prefix_flow_id(true);
            if !agents.is_empty() {
                builder = builder.agents(agents);
            }
            let mut viewer = builder.build();
            viewer.run(&mut stdout).await?;
        }
        _ => {
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
