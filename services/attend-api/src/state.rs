use attend_checkin::CheckInService;
use attend_config::{GeofenceConfig, ServiceConfig, SessionConfig};
use attend_identity::{InMemorySessionStore, SessionStore};
use attend_storage::{AttendanceRepository, EmployeeRepository, OfficeRepository};
use std::sync::Arc;

pub struct AppState {
    pub config: ServiceConfig,
    pub session_config: SessionConfig,
    pub sessions: Arc<dyn SessionStore>,
    pub offices: Arc<dyn OfficeRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub attendance: Arc<dyn AttendanceRepository>,
    pub checkin: CheckInService,
}

impl AppState {
    pub fn new<S>(
        config: ServiceConfig,
        session_config: SessionConfig,
        geofence: GeofenceConfig,
        store: S,
    ) -> Self
    where
        S: OfficeRepository + EmployeeRepository + AttendanceRepository + 'static,
    {
        let store = Arc::new(store);
        let offices: Arc<dyn OfficeRepository> = store.clone();
        let employees: Arc<dyn EmployeeRepository> = store.clone();
        let attendance: Arc<dyn AttendanceRepository> = store;
        let checkin = CheckInService::new(
            offices.clone(),
            employees.clone(),
            attendance.clone(),
            geofence,
        );

        Self {
            config,
            session_config,
            sessions: Arc::new(InMemorySessionStore::new()),
            offices,
            employees,
            attendance,
            checkin,
        }
    }
}
