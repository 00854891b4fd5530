use std::io::Write;

use itertools::Itertools;

use crate::solution::{BatchResult, Route};

/**
Writes the driver schedule of a batch as plain text. Every instance starts with a comment line
naming it, followed by one line per driver listing the load numbers in the order they are served:

```text
# problem1.txt
[1,4,2]
[3]
# problem2.txt
[2,1]
```

The depot is not part of the listing.
 */
pub fn write_schedule(writer: &mut impl Write, result: &BatchResult) -> anyhow::Result<()> {
    for instance in result.instances.iter() {
        writeln!(writer, "# {}", instance.key)?;
        for route in instance.routes.iter() {
            writeln!(writer, "{}", format_route(route))?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn format_route(route: &Route) -> String {
    format!(
        "[{}]",
        route.loads().iter().map(|it| it.sequence_number).join(",")
    )
}
