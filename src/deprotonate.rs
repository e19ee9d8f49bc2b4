//! Controlled deprotonation of detected acid sites.

use tracing::debug;

use crate::acid::detect_acid_sites;
use crate::error::SanitizeError;
use crate::linker::Linker;

/// Remove acidic protons, lowest atom index first.
///
/// `k` bounds how many sites are consumed; `None` removes every detected
/// site. Each consumed hydroxyl oxygen gets formal charge -1 and a zeroed
/// hydrogen count, then the structure is re-sanitized once after the
/// loop. Asking for more removals than there are sites is not an error;
/// the returned count says how many actually happened.
pub fn deprotonate(linker: &mut Linker, k: Option<usize>) -> Result<usize, SanitizeError> {
    let sites = detect_acid_sites(linker.mol());
    let requested = k.unwrap_or(sites.len());

    let mut removed = 0;
    for &site in &sites {
        if removed == requested {
            break;
        }
        linker.set_formal_charge(site, -1);
        linker.set_hydrogen_count(site, 0);
        removed += 1;
    }

    linker.sanitize()?;
    debug!(removed, available = sites.len(), "deprotonation complete");
    Ok(removed)
}
