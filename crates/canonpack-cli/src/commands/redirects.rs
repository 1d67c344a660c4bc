//! Redirect-map validation command.
//!
//! Exit contract: non-zero status and the complete violation list on any
//! structural failure, so a curator can fix the whole map in one pass.

use std::path::Path;

use canonpack_core::redirect::validate_redirects;
use canonpack_core::RedirectMap;
use canonpack_dist::CanonDataset;

pub fn run(canon: String) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = CanonDataset::load(Path::new(&canon))?;
    let redirects_text = dataset
        .redirects_text
        .as_deref()
        .ok_or("identity_redirects.json not found")?;

    let parsed = RedirectMap::parse_json(redirects_text)?;
    let violations = validate_redirects(&parsed, &dataset.editions, &dataset.regions);

    if violations.is_empty() {
        println!(
            "identity_redirects.json valid ({} redirects)",
            parsed.map.len()
        );
        return Ok(());
    }

    eprintln!("identity_redirects.json invalid:");
    for violation in &violations {
        eprintln!("  - {}", violation);
    }
    std::process::exit(1);
}
