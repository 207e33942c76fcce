use serde::Deserialize;

use crate::domain::pagination::{PageLimits, Pagination};
use crate::presentation::http::app_error::AppResult;

/// `?page=&page_size=` for endpoints without any other query parameters.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageQuery {
    pub(crate) page: Option<u32>,
    pub(crate) page_size: Option<u32>,
}

impl PageQuery {
    pub(crate) fn resolve(&self, limits: &PageLimits) -> AppResult<Pagination> {
        Ok(limits.resolve(self.page, self.page_size)?)
    }
}
