use colored::*;
use common::constants::TIMEOUT_SECONDS;
use common::messages::delivery_messages::{DeliveryRequest, DeliveryResponse};
use common::types::dtos::DeliveryRecord;
use common::utils::{display_optional_time, display_time};
use std::env;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

mod command;
use command::{USAGE, parse_args};

#[actix::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{}", e.red());
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    match send(&invocation.server_addr, &invocation.request).await {
        Ok(response) => print_response(&response),
        Err(e) => {
            eprintln!(
                "{}",
                format!("Request to {} failed: {}", invocation.server_addr, e).red()
            );
            std::process::exit(1);
        }
    }
}

async fn send(server_addr: &str, request: &DeliveryRequest) -> std::io::Result<DeliveryResponse> {
    let wait = Duration::from_secs(TIMEOUT_SECONDS);
    let stream = timeout(wait, TcpStream::connect(server_addr)).await??;
    let (read_half, mut write_half) = stream.into_split();

    let line = serde_json::to_string(request)?;
    write_half.write_all(format!("{}\n", line).as_bytes()).await?;

    let mut lines = BufReader::new(read_half).lines();
    match timeout(wait, lines.next_line()).await?? {
        Some(reply) => Ok(serde_json::from_str(&reply)?),
        None => Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "server closed the connection",
        )),
    }
}

fn print_response(response: &DeliveryResponse) {
    match response {
        DeliveryResponse::Accepted {
            order_id,
            driver_name,
            estimated_delivery_time,
        } => println!(
            "{} order {} assigned to {}, expected at {}",
            "✔".green(),
            order_id.bold(),
            driver_name,
            display_time(estimated_delivery_time)
        ),
        DeliveryResponse::Delivery { record } => print_record(record),
        DeliveryResponse::NotFound { order_id } => {
            println!("{} no delivery for order {}", "✘".yellow(), order_id.bold())
        }
        DeliveryResponse::AllDeliveries { deliveries } => {
            if deliveries.is_empty() {
                println!("No deliveries yet.");
            }
            let mut records: Vec<&DeliveryRecord> = deliveries.values().collect();
            records.sort_by_key(|record| record.assigned_at);
            for record in records {
                print_record(record);
            }
        }
        DeliveryResponse::Health { message } => println!("{}", message.green()),
        DeliveryResponse::Error { message } => eprintln!("{}", message.red()),
    }
}

fn print_record(record: &DeliveryRecord) {
    println!(
        "{} [{}] driver {} → {}",
        record.order_id.bold(),
        record.status.to_string().cyan(),
        record.driver_name,
        record.address
    );
    println!(
        "    assigned {} | in transit {} | delivered {} | ETA {}",
        display_time(&record.assigned_at),
        display_optional_time(&record.in_transit_at),
        display_optional_time(&record.delivered_at),
        display_time(&record.estimated_delivery_time)
    );
}
