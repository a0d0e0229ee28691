// In-memory implementation of every repository trait

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex as TokioMutex;
use tracing::debug;
use uuid::Uuid;

use crate::appointments::{
    Appointment, AppointmentError, AppointmentRepository, AppointmentStatus, NewAppointment,
};
use crate::auth::{
    models::{NewUser, Role, User},
    repository::UserRepository,
    AuthError,
};
use crate::messages::{Message, MessageError, MessageRepository, NewMessage};

// Records are kept in insertion order, which doubles as creation order
#[derive(Default)]
struct StoreData {
    users: Vec<User>,
    appointments: Vec<Appointment>,
    messages: Vec<Message>,
}

/// In-memory store (useful for testing)
///
/// Mirrors the Postgres constraints the services rely on: unique email,
/// newest-first listings, status changes that touch `updated_at`.
#[derive(Default)]
pub struct MemoryStore {
    data: TokioMutex<StoreData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, AuthError> {
        let mut data = self.data.lock().await;
        if data.users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailAlreadyExists(format!(
                "{} with this same email already exists!",
                user.role
            )));
        }

        let (avatar_public_id, avatar_url) = match user.doctor_avatar {
            Some(avatar) => (Some(avatar.public_id), Some(avatar.url)),
            None => (None, None),
        };

        let created = User {
            id: Uuid::new_v4(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            national_identity_number: user.national_identity_number,
            dob: user.dob,
            gender: user.gender,
            role: user.role,
            password_hash: user.password_hash,
            doctor_department: user.doctor_department,
            avatar_public_id,
            avatar_url,
            created_at: Utc::now(),
        };
        debug!("Stored user {} in memory", created.id);
        data.users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        let data = self.data.lock().await;
        Ok(data.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let data = self.data.lock().await;
        Ok(data.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_role_and_name(
        &self,
        first_name: &str,
        last_name: &str,
        role: Role,
        department: Option<&str>,
    ) -> Result<Vec<User>, AuthError> {
        let data = self.data.lock().await;
        Ok(data
            .users
            .iter()
            .filter(|u| u.first_name == first_name && u.last_name == last_name && u.role == role)
            .filter(|u| department.map_or(true, |d| u.doctor_department.as_deref() == Some(d)))
            .cloned()
            .collect())
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, AuthError> {
        let data = self.data.lock().await;
        let mut users: Vec<User> = data.users.iter().filter(|u| u.role == role).cloned().collect();
        users.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });
        Ok(users)
    }
}

#[async_trait]
impl AppointmentRepository for MemoryStore {
    async fn create(&self, appointment: NewAppointment) -> Result<Appointment, AppointmentError> {
        let mut data = self.data.lock().await;
        let now = Utc::now();
        let created = Appointment {
            id: Uuid::new_v4(),
            first_name: appointment.first_name,
            last_name: appointment.last_name,
            email: appointment.email,
            phone: appointment.phone,
            national_identity_number: appointment.national_identity_number,
            dob: appointment.dob,
            gender: appointment.gender,
            appointment_date: appointment.appointment_date,
            department: appointment.department,
            doctor_first_name: appointment.doctor_first_name,
            doctor_last_name: appointment.doctor_last_name,
            has_visited: appointment.has_visited,
            address: appointment.address,
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
            status: AppointmentStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        data.appointments.push(created.clone());
        Ok(created)
    }

    async fn list_all(&self) -> Result<Vec<Appointment>, AppointmentError> {
        let data = self.data.lock().await;
        Ok(data.appointments.iter().rev().cloned().collect())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, AppointmentError> {
        let mut data = self.data.lock().await;
        Ok(data.appointments.iter_mut().find(|a| a.id == id).map(|a| {
            a.status = status;
            a.updated_at = Utc::now();
            a.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppointmentError> {
        let mut data = self.data.lock().await;
        let before = data.appointments.len();
        data.appointments.retain(|a| a.id != id);
        Ok(data.appointments.len() < before)
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn create(&self, message: NewMessage) -> Result<Message, MessageError> {
        let mut data = self.data.lock().await;
        let created = Message {
            id: Uuid::new_v4(),
            first_name: message.first_name,
            last_name: message.last_name,
            email: message.email,
            phone: message.phone,
            message: message.message,
            created_at: Utc::now(),
        };
        data.messages.push(created.clone());
        Ok(created)
    }

    async fn list_all(&self) -> Result<Vec<Message>, MessageError> {
        let data = self.data.lock().await;
        Ok(data.messages.iter().rev().cloned().collect())
    }
}
