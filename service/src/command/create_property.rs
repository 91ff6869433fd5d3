//! [`Command`] for creating a new [`Property`].

use common::{operations::Insert, DateTime};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::property::{Area, Price, Specifications};
use crate::{
    domain::{amenity, property, Property},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Property`].
#[derive(Clone, Debug)]
pub struct CreateProperty {
    /// [`property::Title`] of a new [`Property`].
    pub title: property::Title,

    /// [`property::City`] of a new [`Property`].
    pub city: property::City,

    /// [`property::Address`] of a new [`Property`].
    pub address: Option<property::Address>,

    /// [`property::Kind`] of a new [`Property`].
    pub kind: property::Kind,

    /// [`Price`] of a new [`Property`].
    pub price: Option<property::Price>,

    /// [`Area`] of a new [`Property`].
    pub area: Option<property::Area>,

    /// [`Specifications`] of a new [`Property`].
    ///
    /// Must match the declared [`property::Kind`].
    pub specifications: Option<property::Specifications>,

    /// IDs of [`Amenity`]s of a new [`Property`].
    ///
    /// [`Amenity`]: crate::domain::Amenity
    pub amenities: Vec<amenity::Id>,
}

impl<Db> Command<CreateProperty> for Service<Db>
where
    Db: Database<Insert<Property>, Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateProperty {
            title,
            city,
            address,
            kind,
            price,
            area,
            specifications,
            amenities,
        } = cmd;

        if let Some(specs) = &specifications {
            if specs.kind() != kind {
                return Err(tracerr::new!(E::SpecificationsMismatch {
                    kind,
                    specifications: specs.kind(),
                }));
            }
        }

        let property = Property {
            id: property::Id::new(),
            title,
            city,
            address,
            kind,
            price_per_sqft: property::PricePerSqft::derive(price, area),
            price,
            area,
            specifications,
            assigned_agents: vec![],
            amenities,
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(property)
    }
}

/// Error of [`CreateProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided [`Specifications`] do not match the declared
    /// [`property::Kind`].
    #[display(
        "`Specifications` of kind `{specifications}` do not match \
         `Property` kind `{kind}`"
    )]
    SpecificationsMismatch {
        /// Declared [`property::Kind`].
        kind: property::Kind,

        /// [`property::Kind`] of the provided [`Specifications`].
        specifications: property::Kind,
    },
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::property::{
            self,
            specifications::{Apartment, Specifications},
        },
        infra::database::mem::Mem,
        Service,
    };

    use super::{Command as _, CreateProperty};

    fn cmd() -> CreateProperty {
        CreateProperty {
            title: "3BHK in Kondapur".parse().unwrap(),
            city: "Hyderabad".parse().unwrap(),
            address: None,
            kind: property::Kind::Apartment,
            price: None,
            area: None,
            specifications: None,
            amenities: vec![],
        }
    }

    #[tokio::test]
    async fn derives_price_per_sqft() {
        let db = Mem::default();
        let svc = Service::stub(db.clone());

        let created = svc
            .execute(CreateProperty {
                price: Some("7500000".parse().unwrap()),
                area: Some("1500".parse().unwrap()),
                ..cmd()
            })
            .await
            .unwrap();

        let per_sqft = created.price_per_sqft.unwrap();
        assert_eq!(per_sqft.to_string(), "5000");
        assert_eq!(
            db.property(created.id).unwrap().price_per_sqft,
            Some(per_sqft),
        );
    }

    #[tokio::test]
    async fn rejects_mismatched_specifications() {
        let db = Mem::default();
        let svc = Service::stub(db.clone());

        let result = svc
            .execute(CreateProperty {
                kind: property::Kind::Villa,
                specifications: Some(Specifications::Apartment(
                    Apartment::default(),
                )),
                ..cmd()
            })
            .await;

        assert!(result.is_err());
    }
}
