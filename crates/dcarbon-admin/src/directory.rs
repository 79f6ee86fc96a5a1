//! Partner and installer directories: paged lists with a local filter.

use std::sync::Arc;

use dcarbon_api::DirectoryApi;
use dcarbon_core::{DirectoryFilter, Installer, Listed, Page, PageRequest, Partner};

use crate::{Loadable, ScreenError, Ui};

/// Paging and filter state shared by the directory screens.
#[derive(Debug, Clone)]
pub struct DirectoryState<T> {
    request: PageRequest,
    page: Loadable<Page<T>>,
    filter: DirectoryFilter,
}

impl<T> Default for DirectoryState<T> {
    fn default() -> Self {
        Self {
            request: PageRequest::default(),
            page: Loadable::default(),
            filter: DirectoryFilter::default(),
        }
    }
}

impl<T: Listed> DirectoryState<T> {
    pub fn request(&self) -> PageRequest {
        self.request
    }

    pub fn page(&self) -> &Loadable<Page<T>> {
        &self.page
    }

    pub fn filter(&self) -> &DirectoryFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: DirectoryFilter) {
        self.filter = filter;
    }

    /// Rows of the current page that pass the filter.
    pub fn visible(&self) -> Vec<&T> {
        match self.page.data() {
            Some(page) => self.filter.apply(&page.items),
            None => Vec::new(),
        }
    }

    fn has_next(&self) -> bool {
        self.page.data().is_some_and(Page::has_next)
    }

    fn has_previous(&self) -> bool {
        self.request.page > 1
    }
}

macro_rules! directory_screen {
    (
        $(#[$doc:meta])*
        $screen:ident, $record:ty, $what:literal, $noun:literal,
        list: $list:ident, create: $create:ident, update: $update:ident, delete: $delete:ident
    ) => {
        $(#[$doc])*
        pub struct $screen<A> {
            api: Arc<A>,
            ui: Ui,
            state: DirectoryState<$record>,
        }

        impl<A: DirectoryApi> $screen<A> {
            pub fn new(api: Arc<A>, ui: Ui) -> Self {
                Self {
                    api,
                    ui,
                    state: DirectoryState::default(),
                }
            }

            pub fn state(&self) -> &DirectoryState<$record> {
                &self.state
            }

            pub fn set_filter(&mut self, filter: DirectoryFilter) {
                self.state.set_filter(filter);
            }

            pub fn visible(&self) -> Vec<&$record> {
                self.state.visible()
            }

            pub async fn load(&mut self) -> Result<(), ScreenError> {
                self.state.page.begin();
                let result = self.api.$list(self.state.request).await;
                self.state.page.apply(result)
            }

            /// Load `request`; its page size sticks for later paging.
            pub async fn go_to(&mut self, request: PageRequest) -> Result<(), ScreenError> {
                self.state.request = PageRequest {
                    page: request.page.max(1),
                    limit: request.limit.max(1),
                };
                self.load().await
            }

            /// Next page; `false` when already on the last one.
            pub async fn next_page(&mut self) -> Result<bool, ScreenError> {
                if !self.state.has_next() {
                    return Ok(false);
                }
                self.state.request = self.state.request.next();
                self.load().await?;
                Ok(true)
            }

            pub async fn previous_page(&mut self) -> Result<bool, ScreenError> {
                if !self.state.has_previous() {
                    return Ok(false);
                }
                self.state.request.page -= 1;
                self.load().await?;
                Ok(true)
            }

            /// Page through from the first page until `id` turns up.
            pub async fn find(&mut self, id: &str) -> Result<$record, ScreenError> {
                let limit = self.state.request.limit;
                self.go_to(PageRequest { page: 1, limit }).await?;
                loop {
                    let found = self
                        .state
                        .page
                        .data()
                        .and_then(|page| page.items.iter().find(|r| r.id == id));
                    if let Some(record) = found {
                        return Ok(record.clone());
                    }
                    if !self.next_page().await? {
                        return Err(self.ui.unknown(id));
                    }
                }
            }

            pub async fn create(&mut self, record: &$record) -> Result<$record, ScreenError> {
                let result = self.api.$create(record).await;
                let created = self.ui.report(result, concat!($what, " created"))?;
                self.load().await?;
                Ok(created)
            }

            pub async fn update(
                &mut self,
                id: &str,
                record: &$record,
            ) -> Result<$record, ScreenError> {
                let result = self.api.$update(id, record).await;
                let updated = self.ui.report(result, concat!($what, " updated"))?;
                self.load().await?;
                Ok(updated)
            }

            pub async fn delete(&mut self, id: &str) -> Result<(), ScreenError> {
                self.ui
                    .confirm(concat!("Are you sure you want to delete this ", $noun, "?"))?;
                let result = self.api.$delete(id).await;
                self.ui.report(result, concat!($what, " deleted"))?;
                self.load().await
            }
        }
    };
}

directory_screen!(
    /// Sales agents, installers and finance companies registered as partners.
    PartnerScreen, Partner, "Partner", "partner",
    list: list_partners, create: create_partner,
    update: update_partner, delete: delete_partner
);

directory_screen!(
    InstallerScreen, Installer, "Installer", "installer",
    list: list_installers, create: create_installer,
    update: update_installer, delete: delete_installer
);
