#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("resource not found [{0}]")]
    NotFound(String),

    #[error("cannot register more than {max} keywords")]
    KeywordLimit { max: i64 },

    #[error("database pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
}
