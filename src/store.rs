// src/store.rs
//
// Client-side hotel state store: one periodically-refreshed in-memory
// snapshot of rooms, future reservations and guest history, plus the
// derived views (filters, search, statistics) and the booking
// workflows. Owned by the application root and injected where needed;
// all remote access goes through the `RemoteHotel` seam.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::client::{ClientError, RemoteHotel, RoomFields, RoomUpdate};
use crate::domain::pricing::total_stay_price;
use crate::domain::room::default_rooms;
use crate::domain::{
    Guest, GuestHistoryEntry, Reservation, ReservationOutcome, Room, RoomStatus, RoomType,
};

/// Default auto-refresh interval. Configurable; earlier revisions of
/// the dashboard ran anywhere from 10s to 120s.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(30);

/// Transient, UI-local filter criteria. All populated predicates must
/// hold at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelFilters {
    pub room_type: Option<RoomType>,
    pub status: Option<RoomStatus>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HotelStatistics {
    pub total_rooms: usize,
    pub occupied_rooms: usize,
    pub available_rooms: usize,
    pub reserved_rooms: usize,
    pub maintenance_rooms: usize,
    /// occupied / total * 100; 0 when there are no rooms at all.
    pub occupancy_rate: f64,
    pub rooms_by_type: HashMap<String, usize>,
    /// Sum over occupied rooms of rate x party size x nights, plus
    /// expenses.
    pub revenue: f64,
    /// Total party size across occupied rooms.
    pub active_guests: u32,
}

pub struct HotelStore<C: RemoteHotel> {
    client: C,

    rooms: Vec<Room>,
    future_reservations: Vec<Reservation>,
    guest_history: Vec<GuestHistoryEntry>,
    filtered: Vec<Room>,
    filters: HotelFilters,

    sync_interval: Duration,
    last_attempt: Option<Instant>,
    last_sync: Option<Instant>,
    error: Option<String>,
    initialized: bool,
    // Single in-flight guard: a sync requested while one is running is
    // a no-op.
    syncing: bool,
}

impl<C: RemoteHotel> HotelStore<C> {
    pub fn new(client: C) -> Self {
        Self::with_interval(client, DEFAULT_SYNC_INTERVAL)
    }

    pub fn with_interval(client: C, sync_interval: Duration) -> Self {
        Self {
            client,
            rooms: Vec::new(),
            future_reservations: Vec::new(),
            guest_history: Vec::new(),
            filtered: Vec::new(),
            filters: HotelFilters::default(),
            sync_interval,
            last_attempt: None,
            last_sync: None,
            error: None,
            initialized: false,
            syncing: false,
        }
    }

    // ---- synchronization ----

    /// Fetch all three collections and swap the snapshot in one go.
    /// On failure the previous snapshot stays put and the error string
    /// is recorded; the very first failure installs the built-in
    /// default room set so the dashboard is never empty.
    pub fn sync(&mut self) -> Result<(), ClientError> {
        if self.syncing {
            return Ok(());
        }
        self.syncing = true;
        self.last_attempt = Some(Instant::now());

        let result = self.fetch_snapshot();
        self.syncing = false;

        match result {
            Ok((rooms, reservations, history)) => {
                self.rooms = rooms;
                self.future_reservations = reservations;
                self.guest_history = history;
                self.last_sync = Some(Instant::now());
                self.error = None;
                self.initialized = true;
                self.apply_filters();
                Ok(())
            }
            Err(e) => {
                if !self.initialized {
                    self.rooms = default_rooms();
                    self.future_reservations.clear();
                    self.guest_history.clear();
                    self.initialized = true;
                    self.apply_filters();
                }
                self.error = Some(format!("sync failed: {e}"));
                Err(e)
            }
        }
    }

    fn fetch_snapshot(
        &self,
    ) -> Result<(Vec<Room>, Vec<Reservation>, Vec<GuestHistoryEntry>), ClientError> {
        let rooms = self.client.list_rooms()?;
        let reservations = self.client.list_future_reservations()?;
        let history = self.client.list_guest_history()?;
        Ok((rooms, reservations, history))
    }

    /// Timer trigger: re-sync only when the interval has elapsed since
    /// the last attempt. Returns whether a sync actually ran.
    pub fn maybe_sync(&mut self) -> Result<bool, ClientError> {
        let due = match self.last_attempt {
            Some(at) => at.elapsed() >= self.sync_interval,
            None => true,
        };
        if !due {
            return Ok(false);
        }
        self.sync()?;
        Ok(true)
    }

    /// Explicit user-initiated refresh (also the focus/online trigger).
    pub fn refresh(&mut self) -> Result<(), ClientError> {
        self.sync()
    }

    // ---- snapshot accessors ----

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn future_reservations(&self) -> &[Reservation] {
        &self.future_reservations
    }

    /// Ledger entries, newest first.
    pub fn guest_history(&self) -> Vec<GuestHistoryEntry> {
        let mut entries = self.guest_history.clone();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_sync(&self) -> Option<Instant> {
        self.last_sync
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // ---- derived views ----

    pub fn filters(&self) -> &HotelFilters {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: HotelFilters) {
        self.filters = filters;
        self.apply_filters();
    }

    pub fn clear_filters(&mut self) {
        self.filters = HotelFilters::default();
        self.apply_filters();
    }

    pub fn filtered_rooms(&self) -> &[Room] {
        &self.filtered
    }

    fn apply_filters(&mut self) {
        let filters = &self.filters;
        self.filtered = self
            .rooms
            .iter()
            .filter(|room| {
                filters.room_type.map_or(true, |t| room.room_type == t)
                    && filters.status.map_or(true, |s| room.status == s)
                    && filters.min_price.map_or(true, |min| room.price >= min)
                    && filters.max_price.map_or(true, |max| room.price <= max)
            })
            .cloned()
            .collect();
    }

    /// Case-insensitive substring search over room number, room type
    /// and current guest name. An empty term resets to the full list.
    pub fn search_rooms(&mut self, term: &str) {
        if term.is_empty() {
            self.filtered = self.rooms.clone();
            return;
        }

        let term = term.to_lowercase();
        self.filtered = self
            .rooms
            .iter()
            .filter(|room| {
                room.number.to_lowercase().contains(&term)
                    || room.room_type.as_str().to_lowercase().contains(&term)
                    || room
                        .guest
                        .as_ref()
                        .map_or(false, |g| g.name.to_lowercase().contains(&term))
            })
            .cloned()
            .collect();
    }

    pub fn statistics(&self) -> HotelStatistics {
        let total_rooms = self.rooms.len();
        let count = |status: RoomStatus| self.rooms.iter().filter(|r| r.status == status).count();

        let occupied_rooms = count(RoomStatus::Occupied);

        let occupancy_rate = if total_rooms > 0 {
            occupied_rooms as f64 / total_rooms as f64 * 100.0
        } else {
            0.0
        };

        let mut rooms_by_type: HashMap<String, usize> = HashMap::new();
        for room in &self.rooms {
            *rooms_by_type.entry(room.room_type.as_str().to_string()).or_insert(0) += 1;
        }

        let occupied = || {
            self.rooms
                .iter()
                .filter(|r| r.status == RoomStatus::Occupied)
                .filter_map(|r| r.guest.as_ref().map(|g| (r, g)))
        };

        let revenue = occupied()
            .map(|(room, guest)| {
                total_stay_price(
                    room.price,
                    guest.guests,
                    guest.check_in,
                    guest.check_out,
                    &guest.expenses,
                )
            })
            .sum();

        let active_guests = occupied().map(|(_, guest)| guest.guests).sum();

        HotelStatistics {
            total_rooms,
            occupied_rooms,
            available_rooms: count(RoomStatus::Available),
            reserved_rooms: self.future_reservations.len(),
            maintenance_rooms: count(RoomStatus::Maintenance),
            occupancy_rate,
            rooms_by_type,
            revenue,
            active_guests,
        }
    }

    /// Future reservations joined back onto their rooms as a view-time
    /// "reserved" overlay; the underlying room rows stay available.
    pub fn future_reservation_rooms(&self) -> Vec<Room> {
        self.future_reservations
            .iter()
            .filter_map(|reservation| {
                let room = self.rooms.iter().find(|r| r.id == reservation.room_id)?;
                let mut overlay = room.clone();
                overlay.status = RoomStatus::Reserved;
                overlay.guest = Some(reservation.guest.clone());
                Some(overlay)
            })
            .collect()
    }

    // ---- workflows ----
    //
    // Each one is a single remote commit followed by a full
    // resynchronization; the backend owns the multi-write atomicity.

    pub fn make_reservation(
        &mut self,
        room_id: &str,
        guest: Guest,
    ) -> Result<ReservationOutcome, ClientError> {
        let (_, outcome) = self.client.commit_reservation(room_id, &guest)?;
        self.sync()?;
        Ok(outcome)
    }

    pub fn checkout_room(&mut self, room_id: &str) -> Result<(), ClientError> {
        self.client.checkout(room_id)?;
        self.sync()
    }

    pub fn cancel_future_reservation(&mut self, reservation_id: &str) -> Result<(), ClientError> {
        self.client.cancel_reservation(reservation_id)?;
        self.sync()
    }

    pub fn add_expense_to_room(
        &mut self,
        room_id: &str,
        description: &str,
        value: f64,
    ) -> Result<(), ClientError> {
        self.client.add_expense(room_id, description, value)?;
        self.sync()
    }

    pub fn add_room(&mut self, room: RoomFields) -> Result<String, ClientError> {
        let id = self.client.create_room(&room)?;
        self.sync()?;
        Ok(id)
    }

    pub fn update_room(&mut self, room_id: &str, updates: RoomUpdate) -> Result<(), ClientError> {
        self.client.update_room(room_id, &updates)?;
        self.sync()
    }

    pub fn delete_room(&mut self, room_id: &str) -> Result<(), ClientError> {
        self.client.delete_room(room_id)?;
        self.sync()
    }

    pub fn delete_guest_history(&mut self, history_id: &str) -> Result<(), ClientError> {
        self.client.delete_guest_history(history_id)?;
        self.sync()
    }
}
