pub mod query_usecase;

pub use query_usecase::QueryUseCase;
