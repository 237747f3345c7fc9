use crate::config::ConfigPathError;
use crate::storage::StorageError;
use crate::store::StoreError;
use thiserror::Error;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    ConfigPath(#[from] ConfigPathError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::DrawingId;
    use crate::store::DrawingStore;

    fn missing(id: u64) -> EngineResult<()> {
        DrawingStore::new().remove_by_id(DrawingId::new(id))?;
        Ok(())
    }

    #[test]
    fn module_errors_convert_and_keep_their_message() {
        let err = missing(7).unwrap_err();
        assert!(matches!(err, EngineError::Store(StoreError::NotFound(_))));
        assert_eq!(err.to_string(), "drawing-7 not found");

        let err: EngineError = StorageError::EmptyKey.into();
        assert_eq!(err.to_string(), "storage key is empty");
    }
}
