use async_trait::async_trait;
use attend_core::{
    AttendanceId, AttendanceRecord, Employee, EmployeeId, EpochMillis, Office, OfficeId, TenantId,
};
use std::fmt;

#[derive(Debug, Clone)]
pub struct StorageError {
    pub message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StorageError {}

/// Narrows an attendance listing. Time bounds apply to `check_in_at_ms`,
/// `from_ms` inclusive and `to_ms` exclusive.
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub employee_id: Option<EmployeeId>,
    pub office_id: Option<OfficeId>,
    pub from_ms: Option<EpochMillis>,
    pub to_ms: Option<EpochMillis>,
}

impl AttendanceFilter {
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        if self
            .employee_id
            .is_some_and(|employee_id| record.employee_id != employee_id)
        {
            return false;
        }
        if self
            .office_id
            .is_some_and(|office_id| record.office_id != office_id)
        {
            return false;
        }
        if self.from_ms.is_some_and(|from| record.check_in_at_ms < from) {
            return false;
        }
        if self.to_ms.is_some_and(|to| record.check_in_at_ms >= to) {
            return false;
        }
        true
    }
}

/// Result of [`AttendanceRepository::insert_open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenInsert {
    Inserted,
    /// The employee already has this record checked in; nothing was written.
    AlreadyOpen(AttendanceId),
}

#[async_trait]
pub trait OfficeRepository: Send + Sync {
    async fn get(&self, id: OfficeId) -> Result<Option<Office>, StorageError>;
    async fn list_by_tenant(
        &self,
        tenant_id: TenantId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Office>, StorageError>;
    async fn upsert(&self, office: Office) -> Result<(), StorageError>;
    async fn delete(&self, id: OfficeId) -> Result<(), StorageError>;
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn get(&self, id: EmployeeId) -> Result<Option<Employee>, StorageError>;
    async fn list_by_tenant(
        &self,
        tenant_id: TenantId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Employee>, StorageError>;
    async fn upsert(&self, employee: Employee) -> Result<(), StorageError>;
    async fn delete(&self, id: EmployeeId) -> Result<(), StorageError>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn get(&self, id: AttendanceId) -> Result<Option<AttendanceRecord>, StorageError>;
    /// Newest check-in first.
    async fn list_by_tenant(
        &self,
        tenant_id: TenantId,
        filter: &AttendanceFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<AttendanceRecord>, StorageError>;
    /// The employee's record that is still checked in, if any.
    async fn open_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Option<AttendanceRecord>, StorageError>;
    /// Stores a new checked-in record unless the employee already has one
    /// open. The check and the write happen as one step.
    async fn insert_open(&self, record: AttendanceRecord) -> Result<OpenInsert, StorageError>;
    async fn upsert(&self, record: AttendanceRecord) -> Result<(), StorageError>;
}
