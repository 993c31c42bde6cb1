pub mod articles;

#[cfg(test)]
mod tests;

pub use articles::{
    MAX_CANDIDATES, extract_best, extract_candidates, normalize_citations, select_most_cited,
};
