use async_trait::async_trait;
use attend_core::{
    AttendanceId, AttendanceRecord, Employee, EmployeeId, Office, OfficeId, TenantId,
};
use attend_storage::{
    AttendanceFilter, AttendanceRepository, EmployeeRepository, OfficeRepository, OpenInsert,
    StorageError,
};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::RwLock;

type Table<K, V> = Arc<RwLock<HashMap<K, V>>>;

/// Volatile store for local runs and tests. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    offices: Table<OfficeId, Office>,
    employees: Table<EmployeeId, Employee>,
    attendance: Table<AttendanceId, AttendanceRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

async fn page_by_tenant<K, V, F, S>(
    table: &Table<K, V>,
    keep: F,
    sort_key: S,
    limit: usize,
    offset: usize,
) -> Vec<V>
where
    K: Eq + Hash,
    V: Clone,
    F: Fn(&V) -> bool,
    S: Fn(&V) -> u64,
{
    let guard = table.read().await;
    let mut rows: Vec<V> = guard.values().filter(|value| keep(value)).cloned().collect();
    rows.sort_by_key(|value| std::cmp::Reverse(sort_key(value)));
    rows.into_iter().skip(offset).take(limit).collect()
}

fn open_record(
    rows: &HashMap<AttendanceId, AttendanceRecord>,
    employee_id: EmployeeId,
) -> Option<&AttendanceRecord> {
    rows.values()
        .filter(|record| record.employee_id == employee_id && record.is_open())
        .max_by_key(|record| record.check_in_at_ms)
}

#[async_trait]
impl OfficeRepository for MemoryStore {
    async fn get(&self, id: OfficeId) -> Result<Option<Office>, StorageError> {
        Ok(self.offices.read().await.get(&id).cloned())
    }

    async fn list_by_tenant(
        &self,
        tenant_id: TenantId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Office>, StorageError> {
        Ok(page_by_tenant(
            &self.offices,
            |office| office.tenant_id == tenant_id,
            |office| office.created_at_ms,
            limit,
            offset,
        )
        .await)
    }

    async fn upsert(&self, office: Office) -> Result<(), StorageError> {
        self.offices.write().await.insert(office.id, office);
        Ok(())
    }

    async fn delete(&self, id: OfficeId) -> Result<(), StorageError> {
        self.offices.write().await.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl EmployeeRepository for MemoryStore {
    async fn get(&self, id: EmployeeId) -> Result<Option<Employee>, StorageError> {
        Ok(self.employees.read().await.get(&id).cloned())
    }

    async fn list_by_tenant(
        &self,
        tenant_id: TenantId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Employee>, StorageError> {
        Ok(page_by_tenant(
            &self.employees,
            |employee| employee.tenant_id == tenant_id,
            |employee| employee.created_at_ms,
            limit,
            offset,
        )
        .await)
    }

    async fn upsert(&self, employee: Employee) -> Result<(), StorageError> {
        self.employees.write().await.insert(employee.id, employee);
        Ok(())
    }

    async fn delete(&self, id: EmployeeId) -> Result<(), StorageError> {
        self.employees.write().await.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl AttendanceRepository for MemoryStore {
    async fn get(&self, id: AttendanceId) -> Result<Option<AttendanceRecord>, StorageError> {
        Ok(self.attendance.read().await.get(&id).cloned())
    }

    async fn list_by_tenant(
        &self,
        tenant_id: TenantId,
        filter: &AttendanceFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<AttendanceRecord>, StorageError> {
        Ok(page_by_tenant(
            &self.attendance,
            |record| record.tenant_id == tenant_id && filter.matches(record),
            |record| record.check_in_at_ms,
            limit,
            offset,
        )
        .await)
    }

    async fn open_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Option<AttendanceRecord>, StorageError> {
        Ok(open_record(&*self.attendance.read().await, employee_id).cloned())
    }

    async fn insert_open(&self, record: AttendanceRecord) -> Result<OpenInsert, StorageError> {
        let mut guard = self.attendance.write().await;
        if let Some(open) = open_record(&guard, record.employee_id) {
            return Ok(OpenInsert::AlreadyOpen(open.id));
        }
        guard.insert(record.id, record);
        Ok(OpenInsert::Inserted)
    }

    async fn upsert(&self, record: AttendanceRecord) -> Result<(), StorageError> {
        self.attendance.write().await.insert(record.id, record);
        Ok(())
    }
}
