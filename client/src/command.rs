use common::messages::delivery_messages::DeliveryRequest;
use common::types::dtos::OrderReadyEvent;
use common::utils::default_service_address;
use uuid::Uuid;

pub const USAGE: &str = "Usage: client [--addr host:port] <command>
Commands:
  ready [--id ORDER_ID] <customer> <address> <pizza> <quantity>
  status <order_id>
  list
  health";

/// A parsed invocation: where to connect and what to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub server_addr: String,
    pub request: DeliveryRequest,
}

pub fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut rest: Vec<&str> = args.iter().skip(1).map(String::as_str).collect();

    let server_addr = match take_option(&mut rest, "--addr")? {
        Some(addr) => addr,
        None => default_service_address(),
    };

    let Some((command, params)) = rest.split_first() else {
        return Err("Missing command".to_string());
    };

    let request = match (*command, params) {
        ("ready", _) => parse_ready(params)?,
        ("status", [order_id]) => DeliveryRequest::GetDelivery {
            order_id: order_id.to_string(),
        },
        ("list", []) => DeliveryRequest::GetAllDeliveries,
        ("health", []) => DeliveryRequest::Health,
        (other, _) => return Err(format!("Unknown command or wrong arguments: {}", other)),
    };

    Ok(Invocation {
        server_addr,
        request,
    })
}

fn parse_ready(params: &[&str]) -> Result<DeliveryRequest, String> {
    let mut params = params.to_vec();
    let order_id = take_option(&mut params, "--id")?.unwrap_or_else(|| Uuid::new_v4().to_string());

    let [customer_name, address, pizza, quantity] = params.as_slice() else {
        return Err("ready expects <customer> <address> <pizza> <quantity>".to_string());
    };
    let quantity = quantity
        .parse::<i32>()
        .map_err(|_| format!("Invalid quantity: {}", quantity))?;

    Ok(DeliveryRequest::OrderReady(OrderReadyEvent {
        order_id,
        customer_name: customer_name.to_string(),
        address: address.to_string(),
        pizza: pizza.to_string(),
        quantity,
    }))
}

/// Removes `flag <value>` from `args` and returns the value.
fn take_option(args: &mut Vec<&str>, flag: &str) -> Result<Option<String>, String> {
    let Some(pos) = args.iter().position(|arg| *arg == flag) else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        return Err(format!("{} needs a value", flag));
    }
    let value = args[pos + 1].to_string();
    args.drain(pos..=pos + 1);
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("client")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_ready_with_explicit_id() {
        let invocation = parse_args(&args(&[
            "ready", "--id", "X1", "Alice", "1 Main St", "Margherita", "2",
        ]))
        .unwrap();
        assert_eq!(invocation.server_addr, "127.0.0.1:8083");
        assert_eq!(
            invocation.request,
            DeliveryRequest::OrderReady(OrderReadyEvent {
                order_id: "X1".to_string(),
                customer_name: "Alice".to_string(),
                address: "1 Main St".to_string(),
                pizza: "Margherita".to_string(),
                quantity: 2,
            })
        );
    }

    #[test]
    fn test_ready_without_id_generates_one() {
        let invocation =
            parse_args(&args(&["ready", "Bob", "2 Elm St", "Funghi", "1"])).unwrap();
        match invocation.request {
            DeliveryRequest::OrderReady(event) => {
                assert!(Uuid::parse_str(&event.order_id).is_ok());
                assert_eq!(event.customer_name, "Bob");
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_queries_and_custom_address() {
        let invocation =
            parse_args(&args(&["--addr", "10.0.0.5:9000", "status", "X1"])).unwrap();
        assert_eq!(invocation.server_addr, "10.0.0.5:9000");
        assert_eq!(
            invocation.request,
            DeliveryRequest::GetDelivery {
                order_id: "X1".to_string()
            }
        );
        assert_eq!(
            parse_args(&args(&["list"])).unwrap().request,
            DeliveryRequest::GetAllDeliveries
        );
        assert_eq!(
            parse_args(&args(&["health"])).unwrap().request,
            DeliveryRequest::Health
        );
    }

    #[test]
    fn test_usage_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["status"])).is_err());
        assert!(parse_args(&args(&["--addr"])).is_err());
        assert!(parse_args(&args(&["ready", "Bob", "2 Elm St", "Funghi", "many"])).is_err());
        assert!(parse_args(&args(&["fly", "away"])).is_err());
    }
}
