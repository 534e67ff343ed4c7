use super::{json_pretty, parse_params, EXIT_FAILURE, EXIT_SUCCESS};
use ebmock_schema::{validate, Operation};

pub fn run(operation: &str, params: &str, json: bool) -> Result<u8, String> {
    let operation: Operation = operation.parse().map_err(|e| format!("{e}"))?;
    let params = parse_params(params)?;

    match validate(operation, &params) {
        Ok(()) => {
            if json {
                println!(
                    "{}",
                    json_pretty(&serde_json::json!({ "operation": operation.name(), "valid": true }))?
                );
            } else {
                println!("{operation}: ok");
            }
            Ok(EXIT_SUCCESS)
        }
        Err(err) => {
            if json {
                println!("{}", json_pretty(&err)?);
            } else {
                println!("{operation}: {err}");
            }
            Ok(EXIT_FAILURE)
        }
    }
}
