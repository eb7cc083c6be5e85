//! List the capture filters.

use photobooth_model::filter::FilterKind;

pub fn run() -> anyhow::Result<()> {
    println!("{:<14} {:<14} CSS", "NAME", "LABEL");
    for filter in FilterKind::ALL {
        println!("{:<14} {:<14} {}", filter.name(), filter.label(), filter.css());
    }
    Ok(())
}
