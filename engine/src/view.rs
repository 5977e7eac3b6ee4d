//! List view-models for the admin screens.
//!
//! A view-model owns the state of one list screen: its query, the rows last
//! loaded, the total count, and an optional editor form. It performs no IO.
//! Each state change that affects the query yields a [`ListRequest`] for the
//! caller to send, and responses are handed back with the request's sequence
//! number. Only the response to the most recently issued request is applied,
//! so a slow, older response can never overwrite a newer one.
//!
//! Mutations follow the same shape: the view-model yields a [`Mutation`], the
//! caller performs it, then reports the outcome. Success yields a fresh list
//! request; there is no optimistic local update.

use crate::{
    error::Result, CrewMember, CrewMemberId, CrewMemberPatch, Error, NewCrewMember, NewShip, Page,
    PageWindow, Role, Ship, ShipFilter, ShipId, ShipPatch, ShipQuery, Sort, SortField,
    DEFAULT_PAGE_SIZE,
};

/// A list request stamped with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest<Q> {
    pub seq: u64,
    pub query: Q,
}

/// Rows a view can open in its editor form.
pub trait Editable {
    type Key: Copy + PartialEq + std::fmt::Debug;
    type Draft: Default + Clone + std::fmt::Debug;

    fn key(&self) -> Self::Key;

    /// Draft seeded with the row's current values.
    fn to_draft(&self) -> Self::Draft;
}

/// Whether the editor creates a new row or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode<K> {
    Create,
    Edit(K),
}

/// The open editor form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorForm<K, D> {
    pub mode: EditorMode<K>,
    pub draft: D,
}

/// A write the caller should send to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateShip(NewShip),
    UpdateShip(ShipId, ShipPatch),
    DeleteShip(ShipId),
    CreateCrewMember(ShipId, NewCrewMember),
    UpdateCrewMember(ShipId, CrewMemberId, CrewMemberPatch),
    DeleteCrewMember(ShipId, CrewMemberId),
}

/// State of one list screen.
#[derive(Debug, Clone)]
pub struct ListView<Q, R: Editable> {
    query: Q,
    rows: Vec<R>,
    count: u64,
    last_error: Option<String>,
    form: Option<EditorForm<R::Key, R::Draft>>,
    /// Sequence number of the latest request issued
    issued: u64,
}

impl<Q: Clone + PartialEq, R: Editable> ListView<Q, R> {
    pub fn new(query: Q) -> Self {
        Self {
            query,
            rows: Vec::new(),
            count: 0,
            last_error: None,
            form: None,
            issued: 0,
        }
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Total rows matching the query, across all pages.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Message of the last failed load or mutation, until the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn latest_seq(&self) -> u64 {
        self.issued
    }

    /// Issue a request for the current query.
    pub fn refresh(&mut self) -> ListRequest<Q> {
        self.issued += 1;
        ListRequest {
            seq: self.issued,
            query: self.query.clone(),
        }
    }

    /// Replace the query. Issues a request only when it actually changed.
    pub fn set_query(&mut self, query: Q) -> Option<ListRequest<Q>> {
        if query == self.query {
            return None;
        }
        self.query = query;
        Some(self.refresh())
    }

    /// Edit a copy of the query, then [`set_query`](Self::set_query) it.
    pub fn update_query(&mut self, edit: impl FnOnce(&mut Q)) -> Option<ListRequest<Q>> {
        let mut query = self.query.clone();
        edit(&mut query);
        self.set_query(query)
    }

    /// Apply a loaded page. Returns false when the response is stale.
    pub fn apply_page(&mut self, seq: u64, page: Page<R>) -> bool {
        if seq != self.issued {
            return false;
        }
        self.rows = page.records;
        self.count = page.count;
        self.last_error = None;
        true
    }

    /// Record a failed load. Returns false when the response is stale.
    pub fn apply_error(&mut self, seq: u64, message: impl Into<String>) -> bool {
        if seq != self.issued {
            return false;
        }
        self.last_error = Some(message.into());
        true
    }

    pub fn form(&self) -> Option<&EditorForm<R::Key, R::Draft>> {
        self.form.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut R::Draft> {
        self.form.as_mut().map(|form| &mut form.draft)
    }

    /// Open the editor with blank values.
    pub fn open_create(&mut self) {
        self.form = Some(EditorForm {
            mode: EditorMode::Create,
            draft: R::Draft::default(),
        });
    }

    /// Open the editor seeded from a row.
    pub fn open_edit(&mut self, row: &R) {
        self.form = Some(EditorForm {
            mode: EditorMode::Edit(row.key()),
            draft: row.to_draft(),
        });
    }

    /// Discard the editor.
    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// The server accepted a mutation; reload.
    pub fn mutation_succeeded(&mut self) -> ListRequest<Q> {
        self.last_error = None;
        self.refresh()
    }

    /// The server rejected a mutation; keep its message for the operator.
    pub fn mutation_failed(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    /// Run `build` against the open form, closing it on success.
    ///
    /// An advisory validation failure leaves the form open for correction.
    fn submit_with(
        &mut self,
        build: impl FnOnce(&EditorForm<R::Key, R::Draft>) -> Result<Mutation>,
    ) -> Result<Option<Mutation>> {
        let Some(form) = &self.form else {
            return Ok(None);
        };
        let mutation = build(form)?;
        self.form = None;
        Ok(Some(mutation))
    }
}

// --- ships ---

/// Text-input values of the ship editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipDraft {
    pub name: String,
    pub displacement: String,
}

impl ShipDraft {
    /// Advisory check; the server remains the source of truth.
    pub fn to_new_ship(&self) -> Result<NewShip> {
        let displacement = self
            .displacement
            .trim()
            .parse()
            .map_err(|_| Error::invalid_field("displacement", "expected an integer"))?;
        let ship = NewShip::new(self.name.clone(), displacement);
        ship.validate()?;
        Ok(ship)
    }
}

impl Editable for Ship {
    type Key = ShipId;
    type Draft = ShipDraft;

    fn key(&self) -> ShipId {
        self.ship_id
    }

    fn to_draft(&self) -> ShipDraft {
        ShipDraft {
            name: self.name.clone(),
            displacement: self.displacement.to_string(),
        }
    }
}

/// The paginated, filterable, sortable ship list.
pub type ShipListView = ListView<ShipQuery, Ship>;

impl ListView<ShipQuery, Ship> {
    /// Ship list at page 0 with a fixed page size.
    pub fn for_ships(page_size: u64) -> Self {
        Self::new(ShipQuery::new().with_page(PageWindow::new(0, page_size)))
    }

    pub fn page_index(&self) -> u64 {
        self.query.page.map_or(0, |p| p.index)
    }

    pub fn page_size(&self) -> u64 {
        self.query.page.map_or(DEFAULT_PAGE_SIZE, |p| p.size)
    }

    pub fn page_count(&self) -> u64 {
        PageWindow::new(0, self.page_size()).page_count(self.count)
    }

    pub fn set_page(&mut self, index: u64) -> Option<ListRequest<ShipQuery>> {
        let size = self.page_size();
        self.update_query(|q| q.page = Some(PageWindow::new(index, size)))
    }

    /// Replace all filters. Returns to the first page.
    pub fn set_filter(&mut self, filter: ShipFilter) -> Option<ListRequest<ShipQuery>> {
        let size = self.page_size();
        self.update_query(|q| {
            if q.filter != filter {
                q.filter = filter;
                q.page = Some(PageWindow::new(0, size));
            }
        })
    }

    pub fn set_name_filter(&mut self, name: Option<String>) -> Option<ListRequest<ShipQuery>> {
        let filter = ShipFilter {
            name: name.filter(|n| !n.is_empty()),
            ..self.query.filter.clone()
        };
        self.set_filter(filter)
    }

    pub fn set_displacement_filter(
        &mut self,
        displacement: Option<i64>,
    ) -> Option<ListRequest<ShipQuery>> {
        let filter = ShipFilter {
            displacement,
            ..self.query.filter.clone()
        };
        self.set_filter(filter)
    }

    pub fn clear_filters(&mut self) -> Option<ListRequest<ShipQuery>> {
        self.set_filter(ShipFilter::default())
    }

    /// Change the sort. Returns to the first page.
    pub fn set_sort(&mut self, sort: Option<Sort>) -> Option<ListRequest<ShipQuery>> {
        let size = self.page_size();
        self.update_query(|q| {
            if q.sort != sort {
                q.sort = sort;
                q.page = Some(PageWindow::new(0, size));
            }
        })
    }

    /// Column-header click: flip the direction when `field` is already the
    /// sort field, otherwise sort ascending by it. Returns to the first page.
    pub fn toggle_sort(&mut self, field: SortField) -> Option<ListRequest<ShipQuery>> {
        let sort = match self.query.sort {
            Some(current) if current.field == field => Sort::new(field, current.order.reversed()),
            _ => Sort::ascending(field),
        };
        self.set_sort(Some(sort))
    }

    /// Turn the open form into a create or update.
    pub fn submit(&mut self) -> Result<Option<Mutation>> {
        self.submit_with(|form| {
            let ship = form.draft.to_new_ship()?;
            Ok(match form.mode {
                EditorMode::Create => Mutation::CreateShip(ship),
                EditorMode::Edit(id) => Mutation::UpdateShip(
                    id,
                    ShipPatch {
                        name: Some(ship.name),
                        displacement: Some(ship.displacement),
                    },
                ),
            })
        })
    }

    pub fn delete(&self, ship: &Ship) -> Mutation {
        Mutation::DeleteShip(ship.ship_id)
    }
}

// --- crew ---

/// Text-input values of the crew member editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrewMemberDraft {
    pub name: String,
    pub role: String,
}

impl CrewMemberDraft {
    /// Accept only known roles into the role input.
    pub fn set_role(&mut self, role: &str) -> Result<()> {
        let role: Role = role.parse()?;
        self.role = role.as_str().to_string();
        Ok(())
    }

    /// Advisory check; the server remains the source of truth.
    pub fn to_new_crew_member(&self) -> Result<NewCrewMember> {
        let member = NewCrewMember::new(self.name.clone(), self.role.clone());
        member.validate()?;
        Ok(member)
    }
}

impl Editable for CrewMember {
    type Key = CrewMemberId;
    type Draft = CrewMemberDraft;

    fn key(&self) -> CrewMemberId {
        self.crew_member_id
    }

    fn to_draft(&self) -> CrewMemberDraft {
        CrewMemberDraft {
            name: self.name.clone(),
            role: self.role.as_str().to_string(),
        }
    }
}

/// The crew list of one ship. Its query is the owning ship's key.
pub type CrewListView = ListView<ShipId, CrewMember>;

impl ListView<ShipId, CrewMember> {
    pub fn for_ship(ship_id: ShipId) -> Self {
        Self::new(ship_id)
    }

    pub fn ship_id(&self) -> ShipId {
        self.query
    }

    /// Point the view at another ship. Issues a request only on change.
    pub fn set_ship(&mut self, ship_id: ShipId) -> Option<ListRequest<ShipId>> {
        self.set_query(ship_id)
    }

    /// Apply the full crew list of the ship.
    pub fn apply_rows(&mut self, seq: u64, rows: Vec<CrewMember>) -> bool {
        let count = rows.len() as u64;
        self.apply_page(seq, Page::new(rows, count))
    }

    /// Turn the open form into a create or update.
    pub fn submit(&mut self) -> Result<Option<Mutation>> {
        let ship_id = self.query;
        self.submit_with(|form| {
            let member = form.draft.to_new_crew_member()?;
            Ok(match form.mode {
                EditorMode::Create => Mutation::CreateCrewMember(ship_id, member),
                EditorMode::Edit(id) => Mutation::UpdateCrewMember(
                    ship_id,
                    id,
                    CrewMemberPatch {
                        name: Some(member.name),
                        role: Some(member.role),
                    },
                ),
            })
        })
    }

    pub fn delete(&self, member: &CrewMember) -> Mutation {
        Mutation::DeleteCrewMember(self.query, member.crew_member_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SortOrder;

    fn ship(id: i64, name: &str, displacement: i64) -> Ship {
        Ship {
            ship_id: id,
            name: name.into(),
            displacement,
        }
    }

    #[test]
    fn refresh_stamps_increasing_sequence() {
        let mut view = ShipListView::for_ships(2);
        let a = view.refresh();
        let b = view.refresh();
        assert_eq!(a.seq, 1);
        assert_eq!(b.seq, 2);
        assert_eq!(a.query, b.query);
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut view = ShipListView::for_ships(2);
        let first = view.refresh();
        let second = view.set_page(1).unwrap();

        // the newer response arrives first
        assert!(view.apply_page(second.seq, Page::new(vec![ship(3, "Cutty", 90)], 3)));
        assert!(!view.apply_page(first.seq, Page::new(vec![ship(1, "Argo", 120)], 3)));

        assert_eq!(view.rows()[0].ship_id, 3);
        assert!(!view.apply_error(first.seq, "boom"));
        assert_eq!(view.last_error(), None);
    }

    #[test]
    fn unchanged_state_issues_nothing() {
        let mut view = ShipListView::for_ships(2);
        assert!(view.set_page(0).is_none());
        assert!(view.set_sort(None).is_none());
        assert!(view.clear_filters().is_none());
        assert_eq!(view.latest_seq(), 0);
    }

    #[test]
    fn header_click_toggles_direction() {
        let mut view = ShipListView::for_ships(2);

        let request = view.toggle_sort(SortField::Displacement).unwrap();
        assert_eq!(request.query.sort, Some(Sort::ascending(SortField::Displacement)));

        view.set_page(2).unwrap();
        let request = view.toggle_sort(SortField::Displacement).unwrap();
        assert_eq!(
            request.query.sort.map(|s| s.order),
            Some(SortOrder::Descending)
        );
        assert_eq!(view.page_index(), 0);

        let request = view.toggle_sort(SortField::Name).unwrap();
        assert_eq!(request.query.sort, Some(Sort::ascending(SortField::Name)));
    }

    #[test]
    fn filter_and_sort_reset_page() {
        let mut view = ShipListView::for_ships(2);
        view.set_page(3).unwrap();
        assert_eq!(view.page_index(), 3);

        let request = view.set_name_filter(Some("Arg".into())).unwrap();
        assert_eq!(request.query.page, Some(PageWindow::new(0, 2)));
        assert_eq!(request.query.filter.name.as_deref(), Some("Arg"));

        view.set_page(2).unwrap();
        let request = view
            .set_sort(Some(Sort::descending(SortField::Displacement)))
            .unwrap();
        assert_eq!(view.page_index(), 0);
        assert_eq!(request.query.filter.name.as_deref(), Some("Arg"));
    }

    #[test]
    fn empty_name_filter_clears_it() {
        let mut view = ShipListView::for_ships(2);
        view.set_name_filter(Some("Arg".into())).unwrap();
        view.set_name_filter(Some(String::new())).unwrap();
        assert!(view.query().filter.is_empty());
    }

    #[test]
    fn page_count_follows_total() {
        let mut view = ShipListView::for_ships(2);
        let request = view.refresh();
        view.apply_page(request.seq, Page::new(vec![], 5));
        assert_eq!(view.page_count(), 3);
    }

    #[test]
    fn create_form_submits_new_ship() {
        let mut view = ShipListView::for_ships(2);
        view.open_create();
        assert_eq!(view.form().unwrap().draft, ShipDraft::default());

        let draft = view.draft_mut().unwrap();
        draft.name = "Argo".into();
        draft.displacement = "120".into();

        let mutation = view.submit().unwrap().unwrap();
        assert_eq!(mutation, Mutation::CreateShip(NewShip::new("Argo", 120)));
        assert!(view.form().is_none());
    }

    #[test]
    fn edit_form_is_seeded_from_row() {
        let mut view = ShipListView::for_ships(2);
        view.open_edit(&ship(7, "Beagle", 235));

        let form = view.form().unwrap();
        assert_eq!(form.mode, EditorMode::Edit(7));
        assert_eq!(form.draft.displacement, "235");

        view.draft_mut().unwrap().name = "Beagle II".into();
        let mutation = view.submit().unwrap().unwrap();
        assert_eq!(
            mutation,
            Mutation::UpdateShip(
                7,
                ShipPatch {
                    name: Some("Beagle II".into()),
                    displacement: Some(235),
                }
            )
        );
    }

    #[test]
    fn invalid_draft_keeps_form_open() {
        let mut view = ShipListView::for_ships(2);
        view.open_create();
        let draft = view.draft_mut().unwrap();
        draft.name = "Ox".into();
        draft.displacement = "120".into();

        assert!(view.submit().is_err());
        assert!(view.form().is_some());

        view.close_form();
        assert_eq!(view.submit(), Ok(None));
    }

    #[test]
    fn mutation_outcomes() {
        let mut view = ShipListView::for_ships(2);
        view.mutation_failed("invalid displacement: must be at least 50");
        assert_eq!(
            view.last_error(),
            Some("invalid displacement: must be at least 50")
        );

        let request = view.mutation_succeeded();
        assert_eq!(request.seq, 1);
        assert_eq!(view.last_error(), None);
    }

    #[test]
    fn crew_view_fetches_only_on_ship_change() {
        let mut view = CrewListView::for_ship(1);
        assert!(view.set_ship(1).is_none());

        let request = view.set_ship(2).unwrap();
        assert_eq!(request.query, 2);
        assert_eq!(view.ship_id(), 2);
    }

    #[test]
    fn crew_rows_set_count() {
        let mut view = CrewListView::for_ship(1);
        let request = view.refresh();
        let rows = vec![CrewMember {
            crew_member_id: 4,
            name: "Haddock".into(),
            role: Role::Captain,
            ship_id: 1,
        }];
        assert!(view.apply_rows(request.seq, rows));
        assert_eq!(view.count(), 1);
    }

    #[test]
    fn crew_role_input_rejects_unknown() {
        let mut draft = CrewMemberDraft::default();
        assert!(draft.set_role("ENSIGN").is_err());
        assert_eq!(draft.role, "");
        draft.set_role("BOATSWAIN").unwrap();
        assert_eq!(draft.role, "BOATSWAIN");
    }

    #[test]
    fn crew_form_targets_owning_ship() {
        let mut view = CrewListView::for_ship(3);
        view.open_create();
        let draft = view.draft_mut().unwrap();
        draft.name = "Haddock".into();
        draft.role = "CAPTAIN".into();

        assert_eq!(
            view.submit().unwrap(),
            Some(Mutation::CreateCrewMember(
                3,
                NewCrewMember::new("Haddock", "CAPTAIN")
            ))
        );

        let member = CrewMember {
            crew_member_id: 9,
            name: "Haddock".into(),
            role: Role::Captain,
            ship_id: 3,
        };
        assert_eq!(view.delete(&member), Mutation::DeleteCrewMember(3, 9));
    }
}
