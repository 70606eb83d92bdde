// src/client/http.rs
use std::cell::RefCell;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::client::{ClientError, LoginSession, RemoteHotel, RoomFields, RoomUpdate};
use crate::domain::{Guest, GuestHistoryEntry, Reservation, ReservationOutcome, Room, RoomStatus};

/// Upper bound on any remote call, covering the full three-collection
/// sync fetch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000/";

/// Blocking HTTP implementation of `RemoteHotel` against the REST API.
pub struct HttpHotelClient {
    client: Client,
    base_url: Url,
    // Session token captured by login; the client lives on a single
    // cooperative context, RefCell is enough.
    token: RefCell<Option<String>>,
}

impl HttpHotelClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Network(format!("invalid base url: {e}")))?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token: RefCell::new(None),
        })
    }

    /// Base URL from HOTEL_API_URL, falling back to the local server.
    pub fn from_env() -> Result<Self, ClientError> {
        let base = std::env::var("HOTEL_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base)
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.borrow_mut() = token;
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Network(format!("invalid url path {path}: {e}")))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token.borrow().as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let resp = self
            .authorized(builder)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        // Error bodies carry {error, details?}; fall back to the status
        // text when the body isn't ours.
        #[derive(Deserialize)]
        struct ErrorBody {
            error: String,
        }
        let message = resp
            .json::<ErrorBody>()
            .map(|b| b.error)
            .unwrap_or_else(|_| status.to_string());

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self.send(self.client.get(self.url(path)?))?;
        resp.json().map_err(|e| ClientError::Decode(e.to_string()))
    }
}

impl RemoteHotel for HttpHotelClient {
    fn list_rooms(&self) -> Result<Vec<Room>, ClientError> {
        self.get_json("rooms")
    }

    fn create_room(&self, room: &RoomFields) -> Result<String, ClientError> {
        #[derive(Deserialize)]
        struct Created {
            id: String,
        }
        let resp = self.send(self.client.post(self.url("rooms")?).json(room))?;
        let created: Created = resp.json().map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(created.id)
    }

    fn update_room(&self, id: &str, updates: &RoomUpdate) -> Result<(), ClientError> {
        self.send(self.client.put(self.url(&format!("rooms/{id}"))?).json(updates))?;
        Ok(())
    }

    fn delete_room(&self, id: &str) -> Result<(), ClientError> {
        self.send(self.client.delete(self.url(&format!("rooms/{id}"))?))?;
        Ok(())
    }

    fn list_future_reservations(&self) -> Result<Vec<Reservation>, ClientError> {
        self.get_json("reservations")
    }

    fn commit_reservation(
        &self,
        room_id: &str,
        guest: &Guest,
    ) -> Result<(String, ReservationOutcome), ClientError> {
        #[derive(Deserialize)]
        struct Committed {
            id: String,
            outcome: ReservationOutcome,
        }

        let body = json!({ "roomId": room_id, "guest": guest });
        let resp = self.send(self.client.post(self.url("reservations")?).json(&body))?;
        let committed: Committed = resp.json().map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok((committed.id, committed.outcome))
    }

    fn cancel_reservation(&self, id: &str) -> Result<(), ClientError> {
        self.send(self.client.delete(self.url(&format!("reservations/{id}"))?))?;
        Ok(())
    }

    fn checkout(&self, room_id: &str) -> Result<(), ClientError> {
        let body = json!({ "status": RoomStatus::Available });
        self.send(
            self.client
                .put(self.url(&format!("rooms/{room_id}/status"))?)
                .json(&body),
        )?;
        Ok(())
    }

    fn add_expense(
        &self,
        room_id: &str,
        description: &str,
        value: f64,
    ) -> Result<(), ClientError> {
        let body = json!({ "roomId": room_id, "description": description, "value": value });
        self.send(self.client.post(self.url("expenses")?).json(&body))?;
        Ok(())
    }

    fn list_guest_history(&self) -> Result<Vec<GuestHistoryEntry>, ClientError> {
        self.get_json("history")
    }

    fn delete_guest_history(&self, id: &str) -> Result<(), ClientError> {
        self.send(self.client.delete(self.url(&format!("history/{id}"))?))?;
        Ok(())
    }

    fn login(&self, email: &str, password: &str) -> Result<LoginSession, ClientError> {
        let body = json!({ "email": email, "password": password });
        let resp = self.send(self.client.post(self.url("auth/login")?).json(&body))?;
        let session: LoginSession = resp.json().map_err(|e| ClientError::Decode(e.to_string()))?;
        self.set_token(Some(session.token.clone()));
        Ok(session)
    }
}
