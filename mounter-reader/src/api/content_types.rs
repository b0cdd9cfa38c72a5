use mounter_core::{ContentType, ResourceKind};

use super::{fetch_list, ApiClient};
use crate::error::ReaderError;
use crate::reader::{ReadContext, ResourceReader};

pub(crate) struct ContentTypesReader<'c> {
    client: &'c dyn ApiClient,
}

impl<'c> ContentTypesReader<'c> {
    pub(crate) fn new(client: &'c dyn ApiClient) -> Self {
        Self { client }
    }
}

impl ResourceReader for ContentTypesReader<'_> {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ContentTypes
    }

    /// Content types keep the order the API lists them in.
    fn read(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), ReaderError> {
        let default_locale = ctx.mounting_point.default_locale();
        for raw in fetch_list(self.client, "content_types", None)? {
            let content_type = ContentType::from_api(&raw, &default_locale)?;
            tracing::debug!("content type '{}' with {} fields", content_type.slug, content_type.fields.len());
            ctx.mounting_point.register_content_type(content_type);
        }
        Ok(())
    }
}
