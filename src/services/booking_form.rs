use std::time::Duration;

use chrono::{Local, NaiveDate};

use crate::errors::BookingError;
use crate::models::booking::DATE_FORMAT;
use crate::models::{ApiResponse, BookingDraft, Service, ServiceRequest, ServiceRequestPayload, Vehicle};
use crate::services::api::ServiceApi;
use crate::services::catalog::{BookingSession, Origin};
use crate::services::credentials::CredentialProvider;
use crate::services::navigation::{Navigator, Route};

pub const SUCCESS_MESSAGE: &str = "Service booked successfully!";
pub const REJECTED_FALLBACK_MESSAGE: &str = "Failed to book service";
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    NoServiceSelected,
    ServiceSelected,
    Submitting,
    Succeeded,
    /// Editable like `ServiceSelected`, with the failure shown.
    Failed,
}

/// A request that passed validation and is ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSubmission {
    pub payload: ServiceRequestPayload,
    pub credential: String,
}

/// Controller behind the "book a service" screen.
///
/// One instance lives for one visit to the screen. Overlapping submissions
/// are refused while the form is `Submitting`.
#[derive(Debug, Clone)]
pub struct BookingForm {
    origin: Origin,
    vehicle: Option<Vehicle>,
    services: Vec<Service>,
    draft: BookingDraft,
    state: FormState,
    error: Option<BookingError>,
    success_message: Option<String>,
    today: NaiveDate,
    redirect_delay: Duration,
}

impl BookingForm {
    pub fn new(session: BookingSession) -> Self {
        let mut form = Self {
            origin: session.origin,
            vehicle: session.vehicle,
            services: session.services,
            draft: BookingDraft::default(),
            state: FormState::NoServiceSelected,
            error: None,
            success_message: None,
            today: Local::now().date_naive(),
            redirect_delay: DEFAULT_REDIRECT_DELAY,
        };

        if let Some(service) = session.preselected {
            form.draft.select(service);
            form.state = FormState::ServiceSelected;
        }

        form
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn vehicle(&self) -> Option<&Vehicle> {
        self.vehicle.as_ref()
    }

    pub fn error(&self) -> Option<&BookingError> {
        self.error.as_ref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn select_service(&mut self, service: Service) -> Result<(), BookingError> {
        match self.state {
            FormState::Submitting => return Err(BookingError::SubmissionInProgress),
            FormState::Succeeded => return Err(BookingError::AlreadySubmitted),
            _ => {}
        }

        tracing::debug!(service_id = service.service_id, "service selected");
        self.draft.select(service);
        self.error = None;
        self.state = FormState::ServiceSelected;
        Ok(())
    }

    /// Selects one of the loaded services by id.
    pub fn select_service_by_id(&mut self, service_id: i64) -> Result<(), BookingError> {
        let service = self
            .services
            .iter()
            .find(|s| s.service_id == service_id)
            .cloned()
            .ok_or(BookingError::MissingService)?;
        self.select_service(service)
    }

    pub fn set_scheduled_date(&mut self, date: impl Into<String>) {
        self.draft.scheduled_date = date.into();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.draft.customer_notes = notes.into();
    }

    /// Vehicle details supplied after a detour through the add-vehicle step.
    pub fn attach_vehicle(&mut self, vehicle: Vehicle) {
        if matches!(self.error, Some(BookingError::MissingVehicle)) {
            self.error = None;
        }
        self.vehicle = Some(vehicle);
    }

    /// Runs the submit guards and moves to `Submitting`. Nothing is sent when
    /// this returns `Err`.
    pub fn begin_submission(
        &mut self,
        credentials: &dyn CredentialProvider,
        navigator: &dyn Navigator,
    ) -> Result<PreparedSubmission, BookingError> {
        match self.state {
            FormState::Submitting => return Err(BookingError::SubmissionInProgress),
            FormState::Succeeded => return Err(BookingError::AlreadySubmitted),
            _ => {}
        }

        match self.validate(credentials) {
            Ok(prepared) => {
                self.error = None;
                self.state = FormState::Submitting;
                Ok(prepared)
            }
            Err(err) => {
                match &err {
                    BookingError::MissingVehicle => {
                        if let Some(service) = &self.draft.service {
                            navigator.navigate(Route::AddVehicle {
                                service_id: service.service_id,
                            });
                        }
                    }
                    BookingError::NotAuthenticated => navigator.navigate(Route::Login),
                    _ => {}
                }
                tracing::debug!(error = %err, "booking submission blocked");
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Applies the backend's answer to a submission started with
    /// [`BookingForm::begin_submission`].
    pub fn finish_submission(
        &mut self,
        result: anyhow::Result<ApiResponse<ServiceRequest>>,
        navigator: &dyn Navigator,
    ) -> Result<(), BookingError> {
        if self.state != FormState::Submitting {
            tracing::warn!(state = ?self.state, "ignoring response for a form that is not submitting");
            return Ok(());
        }

        let outcome = match result {
            Ok(resp) if resp.success => Ok(resp),
            Ok(resp) => Err(BookingError::Rejected(
                resp.message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| REJECTED_FALLBACK_MESSAGE.to_string()),
            )),
            Err(e) => {
                tracing::error!(error = %e, "failed to submit service request");
                Err(BookingError::Transport)
            }
        };

        match outcome {
            Ok(resp) => {
                tracing::info!(
                    request_id = resp.data.as_ref().map(|r| r.request_id.as_str()),
                    "service request created"
                );
                self.state = FormState::Succeeded;
                self.success_message = Some(SUCCESS_MESSAGE.to_string());
                navigator.navigate_after(Route::Dashboard, self.redirect_delay);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "service request failed");
                self.state = FormState::Failed;
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub async fn submit(
        &mut self,
        api: &dyn ServiceApi,
        credentials: &dyn CredentialProvider,
        navigator: &dyn Navigator,
    ) -> Result<(), BookingError> {
        let prepared = self.begin_submission(credentials, navigator)?;
        let result = api
            .create_service_request(&prepared.payload, &prepared.credential)
            .await;
        self.finish_submission(result, navigator)
    }

    fn validate(
        &self,
        credentials: &dyn CredentialProvider,
    ) -> Result<PreparedSubmission, BookingError> {
        let service = self.draft.service.as_ref().ok_or(BookingError::MissingService)?;

        if self.draft.scheduled_date.trim().is_empty() {
            return Err(BookingError::MissingDate);
        }
        let date = self.draft.parsed_date().ok_or(BookingError::InvalidDate)?;
        if date < self.today {
            return Err(BookingError::DateInPast);
        }

        let vehicle = self.vehicle.as_ref().ok_or(BookingError::MissingVehicle)?;
        let credential = credentials
            .credential()
            .ok_or(BookingError::NotAuthenticated)?;

        Ok(PreparedSubmission {
            payload: ServiceRequestPayload {
                vehicle_id: vehicle.vehicle_id,
                service_id: service.service_id,
                scheduled_date: date.format(DATE_FORMAT).to_string(),
                customer_notes: self.draft.customer_notes.clone(),
                estimated_cost: self.draft.estimated_cost,
            },
            credential,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::services::credentials::StaticCredentials;

    enum Reply {
        Success,
        Rejected(Option<&'static str>),
        Transport,
    }

    struct MockApi {
        reply: Reply,
        calls: AtomicUsize,
        last: Mutex<Option<(ServiceRequestPayload, String)>>,
    }

    impl MockApi {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ServiceApi for MockApi {
        async fn list_services(&self) -> anyhow::Result<ApiResponse<Vec<Service>>> {
            unreachable!("the form never lists services")
        }

        async fn create_service_request(
            &self,
            payload: &ServiceRequestPayload,
            credential: &str,
        ) -> anyhow::Result<ApiResponse<ServiceRequest>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some((payload.clone(), credential.to_string()));
            match self.reply {
                Reply::Success => Ok(ApiResponse {
                    success: true,
                    message: Some("created".to_string()),
                    data: None,
                }),
                Reply::Rejected(Some(message)) => Ok(ApiResponse::error(message)),
                Reply::Rejected(None) => Ok(ApiResponse {
                    success: false,
                    message: None,
                    data: None,
                }),
                Reply::Transport => Err(anyhow::anyhow!("connection reset")),
            }
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        immediate: Mutex<Vec<Route>>,
        delayed: Mutex<Vec<(Route, Duration)>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.immediate.lock().unwrap().push(route);
        }

        fn navigate_after(&self, route: Route, delay: Duration) {
            self.delayed.lock().unwrap().push((route, delay));
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 6, 1).unwrap()
    }

    fn service() -> Service {
        Service {
            service_id: 2,
            name: "Brake Inspection".to_string(),
            description: "Pads and discs".to_string(),
            base_price: 800,
            estimated_time: 60,
            category: "Repair".to_string(),
        }
    }

    fn vehicle() -> Vehicle {
        Vehicle {
            vehicle_id: 42,
            brand: "Tata".to_string(),
            model: "Nexon".to_string(),
            year: 2022,
            registration_number: "DL3CAB0001".to_string(),
            fuel_type: "Electric".to_string(),
        }
    }

    fn vehicle_first() -> BookingForm {
        BookingForm::new(BookingSession {
            origin: Origin::VehicleFirst,
            vehicle: Some(vehicle()),
            services: vec![service()],
            preselected: None,
            load_error: None,
        })
        .with_today(today())
    }

    fn catalog_first() -> BookingForm {
        BookingForm::new(BookingSession {
            origin: Origin::CatalogFirst,
            vehicle: None,
            services: vec![service()],
            preselected: Some(service()),
            load_error: None,
        })
        .with_today(today())
    }

    fn creds() -> StaticCredentials {
        StaticCredentials::new("session-token")
    }

    #[test]
    fn test_initial_states() {
        assert_eq!(vehicle_first().state(), FormState::NoServiceSelected);

        let form = catalog_first();
        assert_eq!(form.state(), FormState::ServiceSelected);
        assert_eq!(form.draft().estimated_cost, 800);
    }

    #[test]
    fn test_date_and_notes_keep_selection() {
        let mut form = vehicle_first();
        form.select_service(service()).unwrap();
        form.set_scheduled_date("2030-06-02");
        form.set_notes("Squeaking on the left");
        assert_eq!(form.state(), FormState::ServiceSelected);
        assert_eq!(form.draft().service, Some(service()));
        assert_eq!(form.draft().customer_notes, "Squeaking on the left");
    }

    #[test]
    fn test_select_service_by_id() {
        let mut form = vehicle_first();
        form.select_service_by_id(2).unwrap();
        assert_eq!(form.state(), FormState::ServiceSelected);
        assert_eq!(form.select_service_by_id(99), Err(BookingError::MissingService));
    }

    #[tokio::test]
    async fn test_submit_without_service() {
        let api = MockApi::new(Reply::Success);
        let nav = RecordingNavigator::default();
        let mut form = vehicle_first();
        form.set_scheduled_date("2030-06-02");

        let err = form.submit(&api, &creds(), &nav).await.unwrap_err();
        assert_eq!(err, BookingError::MissingService);
        assert_eq!(err.to_string(), "Please select a service");
        assert_eq!(form.error(), Some(&BookingError::MissingService));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_without_date() {
        let api = MockApi::new(Reply::Success);
        let nav = RecordingNavigator::default();
        let mut form = vehicle_first();
        form.select_service(service()).unwrap();

        let err = form.submit(&api, &creds(), &nav).await.unwrap_err();
        assert_eq!(err.to_string(), "Please select a preferred date");
        assert_eq!(form.state(), FormState::ServiceSelected);
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_with_past_or_malformed_date() {
        let api = MockApi::new(Reply::Success);
        let nav = RecordingNavigator::default();
        let mut form = vehicle_first();
        form.select_service(service()).unwrap();

        form.set_scheduled_date("2030-05-31");
        assert_eq!(
            form.submit(&api, &creds(), &nav).await,
            Err(BookingError::DateInPast)
        );

        form.set_scheduled_date("next tuesday");
        assert_eq!(
            form.submit(&api, &creds(), &nav).await,
            Err(BookingError::InvalidDate)
        );
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_today_is_allowed() {
        let api = MockApi::new(Reply::Success);
        let nav = RecordingNavigator::default();
        let mut form = vehicle_first();
        form.select_service(service()).unwrap();
        form.set_scheduled_date("2030-06-01");

        form.submit(&api, &creds(), &nav).await.unwrap();
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_catalog_first_without_vehicle() {
        let api = MockApi::new(Reply::Success);
        let nav = RecordingNavigator::default();
        let mut form = catalog_first();
        form.set_scheduled_date("2030-06-10");

        let err = form.submit(&api, &creds(), &nav).await.unwrap_err();
        assert_eq!(err.to_string(), "Please add vehicle details first");
        assert_eq!(api.calls(), 0);
        assert_eq!(
            *nav.immediate.lock().unwrap(),
            vec![Route::AddVehicle { service_id: 2 }]
        );
        assert!(nav.delayed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_catalog_first_after_vehicle_attached() {
        let api = MockApi::new(Reply::Success);
        let nav = RecordingNavigator::default();
        let mut form = catalog_first();
        form.set_scheduled_date("2030-06-10");
        assert!(form.submit(&api, &creds(), &nav).await.is_err());

        form.attach_vehicle(vehicle());
        assert!(form.error().is_none());
        form.submit(&api, &creds(), &nav).await.unwrap();
        assert_eq!(form.state(), FormState::Succeeded);
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_credential_redirects_to_login() {
        let api = MockApi::new(Reply::Success);
        let nav = RecordingNavigator::default();
        let mut form = vehicle_first();
        form.select_service(service()).unwrap();
        form.set_scheduled_date("2030-06-10");

        let err = form
            .submit(&api, &StaticCredentials::anonymous(), &nav)
            .await
            .unwrap_err();
        assert_eq!(err, BookingError::NotAuthenticated);
        assert_eq!(*nav.immediate.lock().unwrap(), vec![Route::Login]);
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_submit() {
        let api = MockApi::new(Reply::Success);
        let nav = RecordingNavigator::default();
        let mut form = vehicle_first();
        form.select_service(service()).unwrap();
        form.set_scheduled_date("2030-06-10");
        form.set_notes("  Please call before starting  ");

        form.submit(&api, &creds(), &nav).await.unwrap();

        assert_eq!(form.state(), FormState::Succeeded);
        assert_eq!(form.success_message(), Some(SUCCESS_MESSAGE));
        assert_eq!(
            *nav.delayed.lock().unwrap(),
            vec![(Route::Dashboard, DEFAULT_REDIRECT_DELAY)]
        );
        assert!(nav.immediate.lock().unwrap().is_empty());

        let (payload, credential) = api.last.lock().unwrap().clone().unwrap();
        assert_eq!(credential, "session-token");
        assert_eq!(
            payload,
            ServiceRequestPayload {
                vehicle_id: 42,
                service_id: 2,
                scheduled_date: "2030-06-10".to_string(),
                customer_notes: "  Please call before starting  ".to_string(),
                estimated_cost: 800,
            }
        );
    }

    #[tokio::test]
    async fn test_submit_after_success_is_refused() {
        let api = MockApi::new(Reply::Success);
        let nav = RecordingNavigator::default();
        let mut form = vehicle_first();
        form.select_service(service()).unwrap();
        form.set_scheduled_date("2030-06-10");
        form.submit(&api, &creds(), &nav).await.unwrap();

        assert_eq!(
            form.submit(&api, &creds(), &nav).await,
            Err(BookingError::AlreadySubmitted)
        );
        assert_eq!(form.select_service(service()), Err(BookingError::AlreadySubmitted));
        assert_eq!(api.calls(), 1);
        assert_eq!(nav.delayed.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_submit_surfaces_server_message() {
        let api = MockApi::new(Reply::Rejected(Some("Slot unavailable")));
        let nav = RecordingNavigator::default();
        let mut form = vehicle_first();
        form.select_service(service()).unwrap();
        form.set_scheduled_date("2030-06-10");

        let err = form.submit(&api, &creds(), &nav).await.unwrap_err();
        assert_eq!(err.to_string(), "Slot unavailable");
        assert_eq!(form.state(), FormState::Failed);
        assert_eq!(form.error().map(|e| e.to_string()).as_deref(), Some("Slot unavailable"));
        assert!(nav.delayed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_submit_without_message_uses_fallback() {
        let api = MockApi::new(Reply::Rejected(None));
        let nav = RecordingNavigator::default();
        let mut form = vehicle_first();
        form.select_service(service()).unwrap();
        form.set_scheduled_date("2030-06-10");

        let err = form.submit(&api, &creds(), &nav).await.unwrap_err();
        assert_eq!(err.to_string(), REJECTED_FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_transport_failure_allows_retry() {
        let api = MockApi::new(Reply::Transport);
        let nav = RecordingNavigator::default();
        let mut form = vehicle_first();
        form.select_service(service()).unwrap();
        form.set_scheduled_date("2030-06-10");

        let err = form.submit(&api, &creds(), &nav).await.unwrap_err();
        assert_eq!(err, BookingError::Transport);
        assert_eq!(err.to_string(), "Failed to book service. Please try again.");
        assert_eq!(form.state(), FormState::Failed);

        let err = form.submit(&api, &creds(), &nav).await.unwrap_err();
        assert_eq!(err, BookingError::Transport);
        assert_eq!(api.calls(), 2);

        form.select_service(service()).unwrap();
        assert_eq!(form.state(), FormState::ServiceSelected);
        assert!(form.error().is_none());
    }

    #[test]
    fn test_overlapping_submission_is_refused() {
        let nav = RecordingNavigator::default();
        let mut form = vehicle_first();
        form.select_service(service()).unwrap();
        form.set_scheduled_date("2030-06-10");

        let prepared = form.begin_submission(&creds(), &nav).unwrap();
        assert_eq!(prepared.payload.service_id, 2);
        assert_eq!(form.state(), FormState::Submitting);

        assert_eq!(
            form.begin_submission(&creds(), &nav),
            Err(BookingError::SubmissionInProgress)
        );
        assert_eq!(
            form.select_service(service()),
            Err(BookingError::SubmissionInProgress)
        );

        form.finish_submission(Ok(ApiResponse::error("Slot unavailable")), &nav)
            .unwrap_err();
        assert_eq!(form.state(), FormState::Failed);
    }

    #[tokio::test]
    async fn test_error_classification() {
        let nav = RecordingNavigator::default();

        let mut form = vehicle_first();
        let blocked = form.submit(&MockApi::new(Reply::Success), &creds(), &nav).await;
        assert!(blocked.unwrap_err().is_validation());

        form.select_service(service()).unwrap();
        form.set_scheduled_date("2030-06-10");
        let rejected = form
            .submit(&MockApi::new(Reply::Rejected(Some("Slot unavailable"))), &creds(), &nav)
            .await;
        assert!(!rejected.unwrap_err().is_validation());

        let unreachable = form.submit(&MockApi::new(Reply::Transport), &creds(), &nav).await;
        assert!(!unreachable.unwrap_err().is_validation());
        assert!(!BookingError::SubmissionInProgress.is_validation());
    }

    #[test]
    fn test_finish_without_begin_is_ignored() {
        let nav = RecordingNavigator::default();
        let mut form = vehicle_first();
        form.finish_submission(Err(anyhow::anyhow!("late response")), &nav)
            .unwrap();
        assert_eq!(form.state(), FormState::NoServiceSelected);
        assert!(form.error().is_none());
    }

    #[tokio::test]
    async fn test_custom_redirect_delay() {
        let api = MockApi::new(Reply::Success);
        let nav = RecordingNavigator::default();
        let mut form = vehicle_first().with_redirect_delay(Duration::from_millis(500));
        form.select_service(service()).unwrap();
        form.set_scheduled_date("2030-06-10");
        form.submit(&api, &creds(), &nav).await.unwrap();

        assert_eq!(
            *nav.delayed.lock().unwrap(),
            vec![(Route::Dashboard, Duration::from_millis(500))]
        );
    }
}
