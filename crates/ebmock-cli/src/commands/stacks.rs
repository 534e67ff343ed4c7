use super::{json_pretty, EXIT_SUCCESS};
use ebmock_schema::list_solution_stacks;

pub fn run(json: bool) -> Result<u8, String> {
    let stacks = list_solution_stacks();
    if json {
        println!("{}", json_pretty(&stacks)?);
    } else {
        for stack in stacks {
            println!("{stack}");
        }
    }
    Ok(EXIT_SUCCESS)
}
