use mounter_core::{Locale, Localized, ResourceKind, Site, DEFAULT_LOCALE};
use serde_json::Value;

use super::{string_at, strings_at, ApiClient};
use crate::error::ReaderError;
use crate::reader::{ReadContext, ResourceReader};

const RESOURCE: &str = "current_site";

pub(crate) struct SiteReader<'c> {
    client: &'c dyn ApiClient,
}

impl<'c> SiteReader<'c> {
    pub(crate) fn new(client: &'c dyn ApiClient) -> Self {
        Self { client }
    }
}

impl ResourceReader for SiteReader<'_> {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Site
    }

    fn read(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), ReaderError> {
        let raw = self.client.get(RESOURCE, None)?;

        let locales: Vec<Locale> = strings_at(&raw, "locales").into_iter().map(Locale::from).collect();
        let default_locale = locales.first().cloned().unwrap_or_else(|| Locale::from(DEFAULT_LOCALE));

        let mut site = Site {
            name: string_at(&raw, &["name"]).unwrap_or_default(),
            subdomain: string_at(&raw, &["subdomain"]),
            domains: strings_at(&raw, "domains"),
            locales: locales.clone(),
            timezone: string_at(&raw, &["timezone", "timezone_name"]),
            ..Site::default()
        };
        assign_seo(&mut site, &raw, &default_locale);

        for locale in locales.iter().skip(1) {
            let translated = self.client.get(RESOURCE, Some(locale))?;
            assign_seo(&mut site, &translated, locale);
        }

        ctx.mounting_point.register_site(site);
        Ok(())
    }
}

fn assign_seo(site: &mut Site, raw: &Value, locale: &Locale) {
    let fields: [(&str, &mut Localized<String>); 3] = [
        ("seo_title", &mut site.seo_title),
        ("meta_keywords", &mut site.meta_keywords),
        ("meta_description", &mut site.meta_description),
    ];
    for (key, target) in fields {
        if let Some(value) = string_at(raw, &[key]) {
            target.set_in(locale.clone(), value);
        }
    }
}
