//! One-call bucketing for any record source.

use crate::config::AlphabarConfig;
use crate::paginator::BucketPaginator;
use crate::source::RecordSource;
use crate::Result;

/// Extension trait building, resolving and returning a paginator in one go.
///
/// ```ignore
/// let (users, paginator) = source.alpha_scope("last_name", params.get("ltr"))?;
/// ```
pub trait AlphaScopeExt: RecordSource {
    /// Buckets by `field` with default configuration.
    fn alpha_scope(
        &self,
        field: &str,
        group: Option<&str>,
    ) -> Result<(Self::Records, BucketPaginator)> {
        self.alpha_scope_with(field, group, &AlphabarConfig::default(), |_| {})
    }

    /// Buckets by `field` starting from `config`; `configure` may adjust
    /// the paginator before it is resolved.
    fn alpha_scope_with<F>(
        &self,
        field: &str,
        group: Option<&str>,
        config: &AlphabarConfig,
        configure: F,
    ) -> Result<(Self::Records, BucketPaginator)>
    where
        F: FnOnce(&mut BucketPaginator),
    {
        let mut paginator = BucketPaginator::with_config(config);
        paginator.set_field(field).set_group(group);
        configure(&mut paginator);

        let records = paginator.resolve(self)?;
        Ok((records, paginator))
    }
}

impl<S: RecordSource + ?Sized> AlphaScopeExt for S {}
