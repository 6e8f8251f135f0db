use crate::catalog::Catalog;
use crate::solutions::SolutionMap;

/// Reference data a puzzle needs: the song catalog and the answer schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PuzzleData {
    pub catalog: Catalog,
    pub solutions: SolutionMap,
}

impl PuzzleData {
    #[must_use]
    pub const fn new(catalog: Catalog, solutions: SolutionMap) -> Self {
        Self { catalog, solutions }
    }
}

/// Collects the two independently loaded data sets.
///
/// The join only yields once both halves have arrived; either one alone
/// leaves it waiting.
#[derive(Debug, Clone, Default)]
pub struct DataJoin {
    catalog: Option<Catalog>,
    solutions: Option<SolutionMap>,
}

impl DataJoin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn supply_catalog(&mut self, catalog: Catalog) {
        log::debug!("catalog loaded ({} songs)", catalog.len());
        self.catalog = Some(catalog);
    }

    pub fn supply_solutions(&mut self, solutions: SolutionMap) {
        log::debug!("solutions loaded ({} dates)", solutions.len());
        self.solutions = Some(solutions);
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.catalog.is_some() && self.solutions.is_some()
    }

    /// Take both halves once present; otherwise leave the join untouched.
    pub fn take(&mut self) -> Option<PuzzleData> {
        if !self.is_ready() {
            return None;
        }
        let catalog = self.catalog.take()?;
        let solutions = self.solutions.take()?;
        Some(PuzzleData { catalog, solutions })
    }
}

/// Await both loads concurrently and join them.
///
/// # Errors
///
/// Returns the first error produced by either load.
#[cfg(feature = "async")]
pub async fn join_loads<C, S, E>(catalog: C, solutions: S) -> Result<PuzzleData, E>
where
    C: std::future::Future<Output = Result<Catalog, E>>,
    S: std::future::Future<Output = Result<SolutionMap, E>>,
{
    let (catalog, solutions) = tokio::try_join!(catalog, solutions)?;
    Ok(PuzzleData { catalog, solutions })
}
