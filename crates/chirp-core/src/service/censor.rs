//! Post body limits and denylist masking.

pub const MAX_POST_CHARS: usize = 140;

/// Replacement for a denylisted word.
pub const MASK: &str = "****";

const DENYLIST: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Replace every space-delimited token that matches the denylist, ignoring
/// case. Punctuated or partial words ("kerfufflex", "fornax!") are kept.
pub fn mask_denylisted(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            if DENYLIST.contains(&lowered.as_str()) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
