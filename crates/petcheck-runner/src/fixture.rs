//! Precondition resources with guaranteed cleanup
//!
//! [`ScenarioContext::provision`] creates a resource and hands back a
//! [`Fixture`] guard. Dropping the guard deletes the resource, so cleanup runs
//! on normal return, on an early `?` return and while unwinding from a panic.
//! Teardown problems are logged and recorded, never turned into errors.

use std::ops::Deref;

use petcheck_core::{CheckError, Envelope, Order, Pet, TeardownFailure, User};

use crate::client::{ClientError, PetstoreClient};
use crate::context::ScenarioContext;

/// A remote record a fixture can create and delete.
pub trait Resource {
    /// Kind name used in logs and reports
    const KIND: &'static str;

    /// Natural key used by the delete call
    fn key(&self) -> String;

    /// # Errors
    ///
    /// Transport failures only.
    fn create(&self, client: &PetstoreClient) -> Result<Envelope, ClientError>;

    /// # Errors
    ///
    /// Transport failures only.
    fn delete(&self, client: &PetstoreClient) -> Result<Envelope, ClientError>;
}

impl Resource for Pet {
    const KIND: &'static str = "pet";

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn create(&self, client: &PetstoreClient) -> Result<Envelope, ClientError> {
        client.create_pet(self)
    }

    fn delete(&self, client: &PetstoreClient) -> Result<Envelope, ClientError> {
        client.delete_pet(self.id)
    }
}

impl Resource for User {
    const KIND: &'static str = "user";

    fn key(&self) -> String {
        self.username.clone()
    }

    fn create(&self, client: &PetstoreClient) -> Result<Envelope, ClientError> {
        client.create_user(self)
    }

    fn delete(&self, client: &PetstoreClient) -> Result<Envelope, ClientError> {
        client.delete_user(&self.username)
    }
}

impl Resource for Order {
    const KIND: &'static str = "order";

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn create(&self, client: &PetstoreClient) -> Result<Envelope, ClientError> {
        client.create_order(self)
    }

    fn delete(&self, client: &PetstoreClient) -> Result<Envelope, ClientError> {
        client.delete_order(self.id)
    }
}

/// A created resource plus its pending cleanup
#[derive(Debug)]
pub struct Fixture<'a, T: Resource> {
    ctx: &'a ScenarioContext<'a>,
    resource: T,
    created: Envelope,
}

impl<T: Resource> Fixture<'_, T> {
    /// The creation response.
    #[must_use]
    pub fn created(&self) -> &Envelope {
        &self.created
    }

    #[must_use]
    pub fn resource(&self) -> &T {
        &self.resource
    }
}

impl<T: Resource> Deref for Fixture<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.resource
    }
}

impl<T: Resource> Drop for Fixture<'_, T> {
    fn drop(&mut self) {
        let key = self.resource.key();
        let reason = match self.resource.delete(self.ctx.client()) {
            Ok(resp) if resp.is_success() => {
                tracing::info!("teardown: deleted {} {key}", T::KIND);
                return;
            }
            Ok(resp) if resp.status == 404 => {
                tracing::debug!("teardown: {} {key} already gone", T::KIND);
                return;
            }
            Ok(resp) => format!("{} returned {}", resp.operation(), resp.status),
            Err(e) => e.to_string(),
        };
        tracing::warn!("teardown: could not delete {} {key}: {reason}", T::KIND);
        self.ctx.record_teardown_failure(TeardownFailure {
            scenario: self.ctx.scenario().to_string(),
            resource: T::KIND.to_string(),
            key,
            reason,
        });
    }
}

impl<'h> ScenarioContext<'h> {
    /// Create `resource` and return a guard that deletes it when dropped.
    ///
    /// # Errors
    ///
    /// [`CheckError::FixtureSetup`] if the create call fails or returns non-2xx.
    /// Nothing is deleted in that case.
    pub fn provision<'a, T: Resource>(&'a self, resource: T) -> Result<Fixture<'a, T>, CheckError>
    where
        'h: 'a,
    {
        let key = resource.key();
        let setup_failed = |reason: String| CheckError::FixtureSetup {
            resource: T::KIND,
            key: key.clone(),
            reason,
        };

        let created = resource
            .create(self.client())
            .map_err(|e| setup_failed(e.to_string()))?;
        if !created.is_success() {
            tracing::error!(
                "setup: creating {} {key} returned {}",
                T::KIND,
                created.status
            );
            return Err(setup_failed(format!(
                "{} returned {}",
                created.operation(),
                created.status
            )));
        }
        tracing::info!("setup: created {} {key}", T::KIND);

        Ok(Fixture {
            ctx: self,
            resource,
            created,
        })
    }
}
