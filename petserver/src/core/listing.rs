//! Pet listing with trait filter and page-number pagination

use serde::Deserialize;
use std::sync::Arc;
use url::form_urlencoded;

use shared::{Page, PetView};
use crate::core::pets::PetService;
use crate::error::{PetServerError, PetServerResult};
use crate::traits::{GroupRepository, PetRepository, TraitRepository};
use crate::types::PetFilter;

pub const DEFAULT_PAGE_SIZE: usize = 2;

/// Query parameters of a listing request
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListParams {
    #[serde(rename = "trait")]
    pub trait_name: Option<String>,
    pub page: Option<String>,
}

impl ListParams {
    /// Blank filters are treated as no filter
    fn trait_filter(&self) -> Option<&str> {
        self.trait_name.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }
}

pub struct PetListing<G, T, P> {
    service: Arc<PetService<G, T, P>>,
    page_size: usize,
    base_path: String,
}

impl<G, T, P> PetListing<G, T, P>
where
    G: GroupRepository,
    T: TraitRepository,
    P: PetRepository,
{
    /// `page_size` must be positive; links are built relative to `base_path`
    pub fn new(service: Arc<PetService<G, T, P>>, page_size: usize, base_path: impl Into<String>) -> Self {
        Self {
            service,
            page_size: page_size.max(1),
            base_path: base_path.into(),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub async fn resolve_filter(&self, trait_name: Option<&str>) -> PetServerResult<PetFilter> {
        Ok(match trait_name {
            None => PetFilter::All,
            Some(name) => match self.service.reconciler().find_trait(name).await? {
                Some(record) => PetFilter::WithTrait(record.id),
                None => PetFilter::NoSuchTrait,
            },
        })
    }

    pub async fn list(&self, params: &ListParams) -> PetServerResult<Page<PetView>> {
        let trait_name = params.trait_filter();
        let filter = self.resolve_filter(trait_name).await?;

        let pets = self.service.pets();
        let count = pets.count(&filter).await?;
        let page_count = count.div_ceil(self.page_size).max(1);
        let page = parse_page(params.page.as_deref(), page_count)?;

        let records = pets.list(&filter, (page - 1) * self.page_size, self.page_size).await?;
        let mut results = Vec::with_capacity(records.len());
        for record in records {
            results.push(self.service.render(record).await?);
        }

        Ok(Page {
            count,
            next: (page < page_count).then(|| self.link(trait_name, page + 1)),
            previous: (page > 1).then(|| self.link(trait_name, page - 1)),
            results,
        })
    }

    /// Page 1 links carry no `page` parameter
    fn link(&self, trait_name: Option<&str>, page: usize) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(name) = trait_name {
            query.append_pair("trait", name);
        }
        if page > 1 {
            query.append_pair("page", &page.to_string());
        }
        let query = query.finish();

        if query.is_empty() {
            self.base_path.clone()
        } else {
            format!("{}?{}", self.base_path, query)
        }
    }
}

/// Accepts a positive page number or `last`; absent means the first page
fn parse_page(raw: Option<&str>, page_count: usize) -> PetServerResult<usize> {
    let invalid = || PetServerError::InvalidPage { page: raw.unwrap_or_default().to_string() };
    let page = match raw.map(str::trim) {
        None | Some("") => 1,
        Some("last") => page_count,
        Some(value) => value.parse::<usize>().map_err(|_| invalid())?,
    };
    if page == 0 || page > page_count {
        return Err(invalid());
    }
    Ok(page)
}
