use super::{json_pretty, EXIT_SUCCESS};
use ebmock_core::Action;
use serde::Serialize;

#[derive(Serialize)]
struct OperationRow {
    name: &'static str,
    kind: &'static str,
}

fn kind(action: Action) -> &'static str {
    match action {
        Action::Modeled(_) => "modeled",
        Action::Unsupported(_) => "stub",
        Action::CreateBucket | Action::PutObject => "bucket",
    }
}

pub fn run(json: bool) -> Result<u8, String> {
    let rows: Vec<OperationRow> = Action::all()
        .map(|action| OperationRow {
            name: action.name(),
            kind: kind(action),
        })
        .collect();
    if json {
        println!("{}", json_pretty(&rows)?);
    } else {
        println!("{:<36} KIND", "OPERATION");
        for row in &rows {
            println!("{:<36} {}", row.name, row.kind);
        }
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ebmock_schema::Operation;

    #[test]
    fn kinds_cover_every_action() {
        assert_eq!(kind(Action::Modeled(Operation::CreateEnvironment)), "modeled");
        assert_eq!(kind(Action::CreateBucket), "bucket");
        let stubs = Action::all().filter(|a| kind(*a) == "stub").count();
        assert_eq!(stubs, ebmock_core::UNSUPPORTED_OPERATIONS.len());
    }
}
