#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use pitwall_storage::{
    insert_documents, Attributes, Circuit, Collection, CollectionStore, Driver, Filter,
    InMemoryCollectionStore, Location, Race, RaceResult, StorageError, Team, TeamSeat,
};
use serde_json::{json, Value};

pub fn circuit(id: &str, name: &str, country: &str, city: &str) -> Circuit {
    Circuit {
        circuit_id: id.to_string(),
        name: name.to_string(),
        image: format!("https://img.example/{id}.png"),
        location: Location {
            country: country.to_string(),
            city: city.to_string(),
        },
        length_km: 5.793,
        turns: 11,
        attrs: Attributes::new(),
    }
}

pub fn driver(id: &str, given: &str, family: &str, code: &str, team: Option<&str>) -> Driver {
    Driver {
        driver_id: id.to_string(),
        given_name: given.to_string(),
        family_name: family.to_string(),
        nationality: format!("{code} national"),
        country_code: code.to_string(),
        date_of_birth: json!("1998-01-01T00:00:00.000Z"),
        image: format!("https://img.example/{id}.png"),
        url: format!("https://wiki.example/{id}"),
        team_id: team.map(str::to_string),
        attrs: Attributes::new(),
    }
}

pub fn team(id: &str, name: &str, seats: &[&str]) -> Team {
    Team {
        team_id: id.to_string(),
        name: name.to_string(),
        country: None,
        country_code: None,
        principal: "Principal".to_string(),
        base: "Base".to_string(),
        founded_year: 1966,
        engine: "Engine".to_string(),
        drivers: seats
            .iter()
            .enumerate()
            .map(|(i, id)| TeamSeat::new(*id, i as u32 + 1))
            .collect(),
        image: String::new(),
        attrs: Attributes::new(),
    }
}

pub fn race(
    name: &str,
    round: u32,
    circuit_id: &str,
    fastest_lap: Option<&str>,
    results: &[(&str, i64)],
) -> Race {
    Race {
        name: name.to_string(),
        country: "Country".to_string(),
        country_code: "XX".to_string(),
        round,
        circuit_id: circuit_id.to_string(),
        date: json!(format!("2024-09-{round:02}T13:00:00.000Z")),
        sprint_race: false,
        fastest_lap: fastest_lap.map(str::to_string),
        race_results: results
            .iter()
            .enumerate()
            .map(|(i, (id, time))| RaceResult::new(i as u32 + 1, *id, *time, 25 - i as u32))
            .collect(),
        attrs: Attributes::new(),
    }
}

pub fn circuits() -> Vec<Circuit> {
    vec![
        circuit("monza", "Autodromo Nazionale Monza", "Italy", "Monza"),
        circuit("silverstone", "Silverstone Circuit", "UK", "Silverstone"),
        circuit("spa", "Circuit de Spa-Francorchamps", "Belgium", "Stavelot"),
    ]
}

pub fn drivers() -> Vec<Driver> {
    vec![
        driver("verstappen", "Max", "Verstappen", "NL", Some("red_bull")),
        driver("norris", "Lando", "Norris", "GB", Some("mclaren")),
        driver("piastri", "Oscar", "Piastri", "AU", Some("mclaren")),
        driver("leclerc", "Charles", "Leclerc", "MC", Some("ferrari")),
        driver("hamilton", "Lewis", "Hamilton", "GB", None),
    ]
}

pub fn teams() -> Vec<Team> {
    vec![
        team("red_bull", "Red Bull Racing", &["verstappen", "perez"]),
        team("mclaren", "McLaren", &["norris", "piastri"]),
    ]
}

/// Monza has a result for a driver that does not exist; spa has no races
pub fn races() -> Vec<Race> {
    vec![
        race(
            "Italian Grand Prix",
            1,
            "monza",
            Some("norris"),
            &[
                ("leclerc", 4_800_123),
                ("piastri", 4_805_456),
                ("norris", 4_810_789),
                ("ghost", 4_900_000),
                ("verstappen", 4_937_000),
            ],
        ),
        race(
            "British Grand Prix",
            2,
            "silverstone",
            Some("hamilton"),
            &[
                ("hamilton", 5_436_201),
                ("verstappen", 5_437_666),
                ("norris", 5_443_000),
            ],
        ),
        race(
            "Italian Grand Prix Sprint",
            3,
            "monza",
            None,
            &[("piastri", 1_800_000), ("leclerc", 1_801_000)],
        ),
    ]
}

pub async fn seed<S: CollectionStore + ?Sized>(store: &S) {
    insert_documents(store, &circuits()).await.unwrap();
    insert_documents(store, &drivers()).await.unwrap();
    insert_documents(store, &teams()).await.unwrap();
    insert_documents(store, &races()).await.unwrap();
}

pub async fn seeded_memory_store() -> InMemoryCollectionStore {
    let store = InMemoryCollectionStore::new();
    seed(&store).await;
    store
}

/// Records every `find` before delegating
pub struct CountingStore<S> {
    inner: S,
    finds: Mutex<Vec<Collection>>,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            finds: Mutex::new(Vec::new()),
        }
    }

    /// Collections queried so far, sorted
    pub fn finds(&self) -> Vec<Collection> {
        let mut finds = self.finds.lock().unwrap().clone();
        finds.sort();
        finds
    }
}

#[async_trait]
impl<S: CollectionStore> CollectionStore for CountingStore<S> {
    async fn find(&self, collection: Collection, filter: &Filter) -> pitwall_storage::Result<Vec<Value>> {
        self.finds.lock().unwrap().push(collection);
        self.inner.find(collection, filter).await
    }

    async fn insert(&self, collection: Collection, document: Value) -> pitwall_storage::Result<()> {
        self.inner.insert(collection, document).await
    }

    async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<Value>,
    ) -> pitwall_storage::Result<()> {
        self.inner.insert_many(collection, documents).await
    }

    async fn count(&self, collection: Collection) -> pitwall_storage::Result<usize> {
        self.inner.count(collection).await
    }
}

/// Fails every `find` against one collection
pub struct FailingStore<S> {
    inner: S,
    broken: Collection,
}

impl<S> FailingStore<S> {
    pub fn new(inner: S, broken: Collection) -> Self {
        Self { inner, broken }
    }
}

#[async_trait]
impl<S: CollectionStore> CollectionStore for FailingStore<S> {
    async fn find(&self, collection: Collection, filter: &Filter) -> pitwall_storage::Result<Vec<Value>> {
        if collection == self.broken {
            return Err(StorageError::unavailable("connection reset by peer"));
        }
        self.inner.find(collection, filter).await
    }

    async fn insert(&self, collection: Collection, document: Value) -> pitwall_storage::Result<()> {
        self.inner.insert(collection, document).await
    }

    async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<Value>,
    ) -> pitwall_storage::Result<()> {
        self.inner.insert_many(collection, documents).await
    }

    async fn count(&self, collection: Collection) -> pitwall_storage::Result<usize> {
        self.inner.count(collection).await
    }
}
