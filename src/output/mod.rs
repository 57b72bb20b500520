//! Output module for rendering browsing results
//!
//! This module handles:
//! - Numbered site listings for a state
//! - Nearby-place listings for a site
//! - The list of known states and territories
//!
//! Everything is written to a caller-supplied `Write` so the session can be
//! driven against an in-memory buffer in tests.

use crate::model::{NearbyPlace, SiteRecord};
use std::io::{self, Write};

const WIDE_RULE: &str = "============================================";
const NARROW_RULE: &str = "=============================";

/// Writes the numbered site list for a state
///
/// Numbering starts at 1 and follows listing order; the session maps the
/// numbers back to sites.
pub fn write_state_sites<W: Write>(out: &mut W, state: &str, sites: &[SiteRecord]) -> io::Result<()> {
    writeln!(out, "{}", WIDE_RULE)?;
    writeln!(out, "List of National Sites in {}", state)?;
    writeln!(out, "{}", WIDE_RULE)?;

    if sites.is_empty() {
        writeln!(out, "(no national sites listed)")?;
    }

    for (i, site) in sites.iter().enumerate() {
        writeln!(out, "[{}] {}", i + 1, site.info())?;
    }

    Ok(())
}

/// Writes the places near a site
pub fn write_nearby_places<W: Write>(
    out: &mut W,
    site: &SiteRecord,
    places: &[NearbyPlace],
) -> io::Result<()> {
    writeln!(out, "{}", NARROW_RULE)?;
    writeln!(out, "Places near {}", site.name)?;
    writeln!(out, "{}", NARROW_RULE)?;

    if places.is_empty() {
        writeln!(out, "(no places found nearby)")?;
    }

    for place in places {
        writeln!(out, "- {}", place)?;
    }

    Ok(())
}

/// Writes the names of every state and territory in the directory
pub fn write_states<W: Write>(out: &mut W, names: &[String]) -> io::Result<()> {
    writeln!(out, "{}", WIDE_RULE)?;
    writeln!(out, "States and Territories")?;
    writeln!(out, "{}", WIDE_RULE)?;

    for name in names {
        writeln!(out, "  {}", name)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(name: &str, category: &str) -> SiteRecord {
        SiteRecord {
            category: category.to_string(),
            name: name.to_string(),
            address: "Houghton, MI".to_string(),
            zipcode: "49931".to_string(),
            phone: "(906) 482-0984".to_string(),
        }
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_state_sites_numbered_from_one() {
        let sites = vec![
            site("Isle Royale", "National Park"),
            site("Keweenaw", "no category"),
        ];
        let text = render(|out| write_state_sites(out, "michigan", &sites));

        assert!(text.contains("List of National Sites in michigan"));
        assert!(text.contains("[1] Isle Royale (National Park): Houghton, MI 49931"));
        assert!(text.contains("[2] Keweenaw (no category): Houghton, MI 49931"));
        assert!(!text.contains("[0]"));
    }

    #[test]
    fn test_empty_state_listing() {
        let text = render(|out| write_state_sites(out, "guam", &[]));
        assert!(text.contains("(no national sites listed)"));
    }

    #[test]
    fn test_nearby_places() {
        let places = vec![NearbyPlace {
            name: "Ranger Bar".to_string(),
            category: "Bars".to_string(),
            address: "no address".to_string(),
            city: "Houghton".to_string(),
        }];
        let text = render(|out| write_nearby_places(out, &site("Isle Royale", ""), &places));

        assert!(text.contains("Places near Isle Royale"));
        assert!(text.contains("- Ranger Bar (Bars): no address, Houghton"));
    }

    #[test]
    fn test_states() {
        let names = vec!["alaska".to_string(), "michigan".to_string()];
        let text = render(|out| write_states(out, &names));

        assert!(text.contains("  alaska\n"));
        assert!(text.contains("  michigan\n"));
    }
}
