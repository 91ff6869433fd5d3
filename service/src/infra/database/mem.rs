//! In-memory [`Database`] used by unit tests.
//!
//! Mirrors the operation set of the Postgres implementation over plain
//! hash maps. [`Transact`] hands out a clone sharing the same state and
//! [`Commit`]/[`Lock`] are no-ops: tests exercise command semantics, not
//! isolation.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use common::operations::{
    By, Commit, Delete, Insert, Lock, Pull, Push, Select, Transact, Update,
};
use derive_more::{Display, Error as StdError};
use tracerr::Traced;

use crate::domain::{
    agent, amenity, assignment, contact, lead, property, Agent, Amenity,
    Contact, Lead, Property,
};

use super::Database;

/// In-memory [`Database`].
#[derive(Clone, Debug, Default)]
pub(crate) struct Mem(Arc<Mutex<State>>);

/// State of a [`Mem`] database.
#[derive(Debug, Default)]
struct State {
    agents: HashMap<agent::Id, Agent>,
    properties: HashMap<property::Id, Property>,
    amenities: HashMap<amenity::Id, Amenity>,
    contacts: HashMap<contact::Id, Contact>,
    leads: HashMap<lead::Id, Lead>,
    drafts: HashMap<lead::Id, lead::Draft>,

    /// Whether [`Insert`]s of [`Lead`]s should fail.
    fail_lead_inserts: bool,
}

impl Mem {
    fn state(&self) -> MutexGuard<'_, State> {
        self.0.lock().expect("`Mem` lock poisoned")
    }

    /// Makes all following [`Insert`]s of [`Lead`]s fail.
    pub(crate) fn fail_lead_inserts(&self, fail: bool) {
        self.state().fail_lead_inserts = fail;
    }

    pub(crate) fn agent(&self, id: agent::Id) -> Option<Agent> {
        self.state().agents.get(&id).cloned()
    }

    pub(crate) fn property(&self, id: property::Id) -> Option<Property> {
        self.state().properties.get(&id).cloned()
    }

    pub(crate) fn contact(&self, id: contact::Id) -> Option<Contact> {
        self.state().contacts.get(&id).cloned()
    }

    pub(crate) fn leads(&self) -> Vec<Lead> {
        self.state().leads.values().cloned().collect()
    }

    pub(crate) fn drafts(&self) -> Vec<lead::Draft> {
        self.state().drafts.values().cloned().collect()
    }
}

/// Error of a [`Mem`] database operation.
#[derive(Clone, Copy, Debug, Display, StdError)]
#[display("injected `Mem` failure")]
pub(crate) struct Error;

impl Database<Transact> for Mem {
    type Ok = Self;
    type Err = Traced<super::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Lock<By<Property, property::Id>>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        _: Lock<By<Property, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Lock<By<Agent, agent::Id>>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        _: Lock<By<Agent, agent::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Select<By<Option<Property>, property::Id>>> for Mem {
    type Ok = Option<Property>;
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().properties.get(&by.into_inner()).cloned())
    }
}

impl Database<Select<By<Option<Agent>, agent::Id>>> for Mem {
    type Ok = Option<Agent>;
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Agent>, agent::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().agents.get(&by.into_inner()).cloned())
    }
}

impl Database<Select<By<HashMap<agent::Id, Agent>, Vec<agent::Id>>>> for Mem {
    type Ok = HashMap<agent::Id, Agent>;
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<agent::Id, Agent>, Vec<agent::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.state();
        Ok(by
            .into_inner()
            .into_iter()
            .filter_map(|id| state.agents.get(&id).cloned().map(|a| (id, a)))
            .collect())
    }
}

impl Database<Select<By<HashMap<amenity::Id, Amenity>, Vec<amenity::Id>>>>
    for Mem
{
    type Ok = HashMap<amenity::Id, Amenity>;
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<HashMap<amenity::Id, Amenity>, Vec<amenity::Id>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.state();
        Ok(by
            .into_inner()
            .into_iter()
            .filter_map(|id| {
                state.amenities.get(&id).cloned().map(|a| (id, a))
            })
            .collect())
    }
}

impl Database<Select<By<Option<Contact>, contact::Id>>> for Mem {
    type Ok = Option<Contact>;
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contact>, contact::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().contacts.get(&by.into_inner()).cloned())
    }
}

impl Database<Select<By<Vec<lead::Draft>, lead::draft::Batch>>> for Mem {
    type Ok = Vec<lead::Draft>;
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<lead::Draft>, lead::draft::Batch>>,
    ) -> Result<Self::Ok, Self::Err> {
        let lead::draft::Batch { limit } = by.into_inner();
        let mut drafts = self.drafts();
        drafts.sort_by_key(|d| (d.attempts, d.lead.created_at));
        drafts.truncate(usize::from(limit));
        Ok(drafts)
    }
}

impl Database<Insert<Property>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Insert(property): Insert<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.state().properties.insert(property.id, property));
        Ok(())
    }
}

impl Database<Update<Property>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Update(property): Update<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.state().properties.insert(property.id, property));
        Ok(())
    }
}

impl Database<Delete<By<Property, property::Id>>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Property, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.state().properties.remove(&by.into_inner()));
        Ok(())
    }
}

impl Database<Insert<Agent>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Insert(agent): Insert<Agent>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.state().agents.insert(agent.id, agent));
        Ok(())
    }
}

impl Database<Update<Agent>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Update(agent): Update<Agent>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.state().agents.insert(agent.id, agent));
        Ok(())
    }
}

impl Database<Delete<By<Agent, agent::Id>>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Agent, agent::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.state().agents.remove(&by.into_inner()));
        Ok(())
    }
}

impl Database<Insert<Amenity>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Insert(amenity): Insert<Amenity>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.state().amenities.insert(amenity.id, amenity));
        Ok(())
    }
}

impl Database<Insert<Contact>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Insert(contact): Insert<Contact>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.state().contacts.insert(contact.id, contact));
        Ok(())
    }
}

impl Database<Update<Contact>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Update(contact): Update<Contact>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.state().contacts.insert(contact.id, contact));
        Ok(())
    }
}

impl Database<Insert<Lead>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Insert(lead): Insert<Lead>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        if state.fail_lead_inserts {
            return Err(tracerr::new!(super::Error::Mem(Error)));
        }
        drop(state.leads.insert(lead.id, lead));
        Ok(())
    }
}

impl Database<Insert<lead::Draft>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<lead::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.state().drafts.insert(draft.lead.id, draft));
        Ok(())
    }
}

impl Database<Update<lead::Draft>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Update(draft): Update<lead::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.state().drafts.insert(draft.lead.id, draft));
        Ok(())
    }
}

impl Database<Delete<By<lead::Draft, lead::Id>>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<lead::Draft, lead::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.state().drafts.remove(&by.into_inner()));
        Ok(())
    }
}

impl Database<Push<assignment::AgentsOfProperty>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Push(assignment): Push<assignment::AgentsOfProperty>,
    ) -> Result<Self::Ok, Self::Err> {
        let assignment::AgentsOfProperty {
            property_id,
            agent_ids,
        } = assignment;

        let mut state = self.state();
        for id in agent_ids {
            if let Some(agent) = state.agents.get_mut(&id) {
                if !agent.assigned_properties.contains(&property_id) {
                    agent.assigned_properties.push(property_id);
                }
            }
        }
        Ok(())
    }
}

impl Database<Pull<assignment::AgentsOfProperty>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Pull(assignment): Pull<assignment::AgentsOfProperty>,
    ) -> Result<Self::Ok, Self::Err> {
        let assignment::AgentsOfProperty {
            property_id,
            agent_ids,
        } = assignment;

        let mut state = self.state();
        for id in agent_ids {
            if let Some(agent) = state.agents.get_mut(&id) {
                agent.assigned_properties.retain(|p| *p != property_id);
            }
        }
        Ok(())
    }
}

impl Database<Push<assignment::PropertiesOfAgent>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Push(assignment): Push<assignment::PropertiesOfAgent>,
    ) -> Result<Self::Ok, Self::Err> {
        let assignment::PropertiesOfAgent {
            agent_id,
            property_ids,
        } = assignment;

        let mut state = self.state();
        for id in property_ids {
            if let Some(property) = state.properties.get_mut(&id) {
                if !property.assigned_agents.contains(&agent_id) {
                    property.assigned_agents.push(agent_id);
                }
            }
        }
        Ok(())
    }
}

impl Database<Pull<assignment::PropertiesOfAgent>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Pull(assignment): Pull<assignment::PropertiesOfAgent>,
    ) -> Result<Self::Ok, Self::Err> {
        let assignment::PropertiesOfAgent {
            agent_id,
            property_ids,
        } = assignment;

        let mut state = self.state();
        for id in property_ids {
            if let Some(property) = state.properties.get_mut(&id) {
                property.assigned_agents.retain(|a| *a != agent_id);
            }
        }
        Ok(())
    }
}

impl Database<Pull<By<Agent, property::Id>>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Pull(by): Pull<By<Agent, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let property_id = by.into_inner();
        for agent in self.state().agents.values_mut() {
            agent.assigned_properties.retain(|p| *p != property_id);
        }
        Ok(())
    }
}

impl Database<Pull<By<Property, agent::Id>>> for Mem {
    type Ok = ();
    type Err = Traced<super::Error>;

    async fn execute(
        &self,
        Pull(by): Pull<By<Property, agent::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let agent_id = by.into_inner();
        for property in self.state().properties.values_mut() {
            property.assigned_agents.retain(|a| *a != agent_id);
        }
        Ok(())
    }
}
