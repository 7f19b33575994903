//! hiverpc CLI — query Hive API nodes from the terminal.
//!
//! Usage:
//! ```bash
//! # Check a node's head block and latency
//! hiverpc test --url https://api.hive.blog
//!
//! # Send a raw JSON-RPC call with failover across several nodes
//! hiverpc call --url https://api.hive.blog --url https://anyx.io \
//!     --method condenser_api.get_dynamic_global_properties
//!
//! # List the built-in public nodes
//! hiverpc nodes
//! ```

use std::env;
use std::process;

use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use hiverpc_core::fetch::FetchConfig;
use hiverpc_http::FailoverClient;
use hiverpc_providers::public;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "test" => cmd_test(&args[2..]).await,
        "call" => cmd_call(&args[2..]).await,
        "nodes" => {
            cmd_nodes();
            Ok(())
        }
        "version" | "--version" | "-V" => {
            println!("hiverpc {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn print_usage() {
    println!("hiverpc {}", env!("CARGO_PKG_VERSION"));
    println!("Query Hive API nodes with automatic failover\n");
    println!("USAGE:");
    println!("    hiverpc <COMMAND>\n");
    println!("COMMANDS:");
    println!("    test       Check a node (head block, latency)");
    println!("    call       Send a raw JSON-RPC call");
    println!("    nodes      List built-in public API nodes");
    println!("    version    Print version");
    println!("    help       Print this help\n");
    println!("FLAGS:");
    println!("    --url <URL>       node endpoint; repeat to enable failover");
    println!("    --method <NAME>   JSON-RPC method (call only)");
    println!("    --params <JSON>   params array, default [] (call only)");
}

fn client_for(args: &[String]) -> FailoverClient {
    let urls = parse_multi_flag(args, "--url");
    if urls.is_empty() {
        public::failover_client()
    } else {
        FailoverClient::new(urls, FetchConfig::default())
    }
}

async fn cmd_test(args: &[String]) -> Result<(), String> {
    let client = client_for(args);
    println!("Testing {}...", client.current_node());

    let start = std::time::Instant::now();
    let props: Value = client
        .call("condenser_api.get_dynamic_global_properties", json!([]))
        .await
        .map_err(|e| e.to_string())?;
    let latency = start.elapsed();

    println!("  Status:       OK");
    println!("  Node:         {}", client.current_node());
    println!("  Head block:   {}", props["head_block_number"]);
    println!("  Latency:      {}ms", latency.as_millis());

    Ok(())
}

async fn cmd_call(args: &[String]) -> Result<(), String> {
    let method = parse_flag(args, "--method").ok_or("--method is required")?;
    let params = match parse_flag(args, "--params") {
        Some(raw) => serde_json::from_str(&raw).map_err(|e| format!("bad --params: {e}"))?,
        None => json!([]),
    };

    let client = client_for(args);
    let result: Value = client
        .call(&method, params)
        .await
        .map_err(|e| e.to_string())?;

    println!("{}", serde_json::to_string_pretty(&result).unwrap_or_default());
    Ok(())
}

fn cmd_nodes() {
    println!("Built-in public Hive API nodes:\n");
    for node in public::PUBLIC_NODES {
        println!("  {node}");
    }
    println!("\nUsed in this order when no --url is given.");
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).cloned()
}

fn parse_multi_flag(args: &[String], flag: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == flag {
            if let Some(value) = iter.next() {
                values.push(value.clone());
            }
        }
    }
    values
}
