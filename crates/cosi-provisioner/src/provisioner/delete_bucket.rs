use super::{Provisioner, Scope};
use crate::{Action, Result, TRACING_TARGET};

impl Provisioner {
    /// Deletes the bucket identified by `bucket_id` and its directory.
    ///
    /// The directory goes first, then the bucket record. Both steps succeed
    /// when the resource is already gone.
    pub async fn delete_bucket(&self, bucket_id: &str) -> Result<()> {
        self.bounded(Action::DeleteBucket, self.remove_bucket(bucket_id))
            .await
    }

    async fn remove_bucket(&self, bucket_id: &str) -> Result<()> {
        let scope = Scope::new(Action::DeleteBucket);
        if bucket_id.is_empty() {
            return Err(scope.invalid("empty bucket ID"));
        }

        let id = scope.decode(bucket_id)?;
        let name = id.bucket_name();
        let scope = scope.bucket(name);

        let path = self.api().bucket_path(name);
        self.api()
            .delete_directory(&path)
            .await
            .map_err(scope.remote("failed to delete bucket directory"))?;

        self.api()
            .delete_bucket(name)
            .await
            .map_err(scope.remote("failed to delete bucket"))?;

        tracing::info!(target: TRACING_TARGET, bucket = %name, path = %path, "Bucket deleted");
        Ok(())
    }
}
