// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! In-memory backend used by tests to drive the MVU kernel without a server.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::logic::api::{ApiError, Operation, StudentsApi};
use crate::models::student::{Student, StudentId, StudentPayload};

/// A request as the backend saw it.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    pub operation: Operation,
    pub id: Option<StudentId>,
    pub payload: Option<StudentPayload>,
}

#[derive(Default)]
struct MemoryState {
    students: Vec<Student>,
    next_id: u64,
    failing: HashSet<Operation>,
    calls: Vec<RecordedCall>,
}

/// Stores records in insertion order and assigns sequential string ids.
#[derive(Default)]
pub struct MemoryStudentsApi {
    state: Mutex<MemoryState>,
}

impl MemoryStudentsApi {
    /// Seed the backend; new ids continue after the highest numeric seed id.
    pub fn with_students(students: Vec<Student>) -> Self {
        let next_id = students
            .iter()
            .filter_map(|s| s.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            state: Mutex::new(MemoryState {
                students,
                next_id,
                ..Default::default()
            }),
        }
    }

    /// Make every subsequent call of `operation` fail with HTTP 503.
    pub fn fail(&self, operation: Operation) {
        self.lock().failing.insert(operation);
    }

    pub fn recover(&self, operation: Operation) {
        self.lock().failing.remove(&operation);
    }

    pub fn students(&self) -> Vec<Student> {
        self.lock().students.clone()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(
        &self,
        operation: Operation,
        id: Option<&StudentId>,
        payload: Option<&StudentPayload>,
    ) -> Result<std::sync::MutexGuard<'_, MemoryState>, ApiError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall {
            operation,
            id: id.cloned(),
            payload: payload.cloned(),
        });
        if state.failing.contains(&operation) {
            return Err(ApiError::Status {
                operation,
                status: 503,
            });
        }
        Ok(state)
    }
}

impl StudentsApi for MemoryStudentsApi {
    fn list(&self) -> Result<Vec<Student>, ApiError> {
        let state = self.begin(Operation::List, None, None)?;
        Ok(state.students.clone())
    }

    fn create(&self, payload: &StudentPayload) -> Result<(), ApiError> {
        let mut state = self.begin(Operation::Create, None, Some(payload))?;
        state.next_id += 1;
        let id = StudentId::new(state.next_id.to_string());
        state.students.push(payload.clone().into_student(id));
        Ok(())
    }

    fn update(&self, id: &StudentId, payload: &StudentPayload) -> Result<(), ApiError> {
        let mut state = self.begin(Operation::Update, Some(id), Some(payload))?;
        let slot = state
            .students
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or(ApiError::Status {
                operation: Operation::Update,
                status: 404,
            })?;
        *slot = payload.clone().into_student(id.clone());
        Ok(())
    }

    fn delete(&self, id: &StudentId) -> Result<(), ApiError> {
        let mut state = self.begin(Operation::Delete, Some(id), None)?;
        let before = state.students.len();
        state.students.retain(|s| &s.id != id);
        if state.students.len() == before {
            return Err(ApiError::Status {
                operation: Operation::Delete,
                status: 404,
            });
        }
        Ok(())
    }
}
