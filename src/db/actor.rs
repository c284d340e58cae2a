use crate::db::queries;
use crate::db::schema::SQLITE_INIT;
use crate::error::MixologyError;
use crate::snapshot::{CollectionSnapshot, GraphRows, ItemSnapshot, OwnerSnapshot};
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tracing::{debug, info, warn};

/// Which collections `list_collections` returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerFilter {
    /// Collections belonging to owners with this name.
    Owner(String),
    /// Shared collections with no owner.
    Unowned,
    All,
}

#[derive(Debug)]
pub enum StoreMessage {
    ListOwners(RpcReplyPort<Result<Vec<OwnerSnapshot>, MixologyError>>),

    /// Insert an owner; `true` rejects the insert if the name is taken.
    CreateOwner(String, bool, RpcReplyPort<Result<(), MixologyError>>),

    /// Delete owners by name, cascading to their collections.
    DeleteOwnersNamed(String, RpcReplyPort<Result<u64, MixologyError>>),

    ListItems(RpcReplyPort<Result<Vec<ItemSnapshot>, MixologyError>>),

    CreateItem(String, RpcReplyPort<Result<(), MixologyError>>),

    DeleteItemsNamed(String, RpcReplyPort<Result<u64, MixologyError>>),

    ListCollections(
        OwnerFilter,
        RpcReplyPort<Result<Vec<CollectionSnapshot>, MixologyError>>,
    ),

    /// Insert a collection, attached to the named owner when one exists.
    CreateCollection(
        String,
        Option<String>,
        RpcReplyPort<Result<(), MixologyError>>,
    ),

    DeleteCollectionsNamed(String, RpcReplyPort<Result<u64, MixologyError>>),

    /// (item, collection)
    Link(String, String, RpcReplyPort<Result<(), MixologyError>>),

    /// (item, collection)
    Unlink(String, String, RpcReplyPort<Result<(), MixologyError>>),
}

/// Cloneable entry point to one logical store.
///
/// All clones feed the same actor mailbox, so operations from every caller
/// execute one at a time in submission order.
#[derive(Clone)]
pub struct StoreHandle {
    actor: ActorRef<StoreMessage>,
}

impl StoreHandle {
    /// All owners sorted by name, each with its collections and their items.
    pub async fn list_owners(&self) -> Result<Vec<OwnerSnapshot>, MixologyError> {
        ractor::call!(self.actor, StoreMessage::ListOwners).map_err(|e| {
            MixologyError::RactorError(format!("StoreActor ListOwners RPC failed: {e}"))
        })?
    }

    /// Inserts an owner without checking for an existing one of the same name.
    pub async fn create_owner(&self, name: &str) -> Result<(), MixologyError> {
        ractor::call!(self.actor, StoreMessage::CreateOwner, name.to_string(), false).map_err(
            |e| MixologyError::RactorError(format!("StoreActor CreateOwner RPC failed: {e}")),
        )?
    }

    /// Inserts an owner, failing with `DuplicateKey` if the name is already taken.
    pub async fn create_owner_unique(&self, name: &str) -> Result<(), MixologyError> {
        ractor::call!(self.actor, StoreMessage::CreateOwner, name.to_string(), true).map_err(
            |e| MixologyError::RactorError(format!("StoreActor CreateOwner RPC failed: {e}")),
        )?
    }

    /// Deletes every owner with this name and all of their collections.
    /// Items stay. Returns how many owners were removed.
    pub async fn delete_owners_named(&self, name: &str) -> Result<u64, MixologyError> {
        ractor::call!(self.actor, StoreMessage::DeleteOwnersNamed, name.to_string()).map_err(
            |e| MixologyError::RactorError(format!("StoreActor DeleteOwnersNamed RPC failed: {e}")),
        )?
    }

    /// All items sorted by name, each with the collections it belongs to.
    pub async fn list_items(&self) -> Result<Vec<ItemSnapshot>, MixologyError> {
        ractor::call!(self.actor, StoreMessage::ListItems).map_err(|e| {
            MixologyError::RactorError(format!("StoreActor ListItems RPC failed: {e}"))
        })?
    }

    pub async fn create_item(&self, name: &str) -> Result<(), MixologyError> {
        ractor::call!(self.actor, StoreMessage::CreateItem, name.to_string()).map_err(|e| {
            MixologyError::RactorError(format!("StoreActor CreateItem RPC failed: {e}"))
        })?
    }

    /// Deletes every item with this name. Zero matches is not an error.
    pub async fn delete_items_named(&self, name: &str) -> Result<u64, MixologyError> {
        ractor::call!(self.actor, StoreMessage::DeleteItemsNamed, name.to_string()).map_err(
            |e| MixologyError::RactorError(format!("StoreActor DeleteItemsNamed RPC failed: {e}")),
        )?
    }

    pub async fn list_collections(
        &self,
        filter: OwnerFilter,
    ) -> Result<Vec<CollectionSnapshot>, MixologyError> {
        ractor::call!(self.actor, StoreMessage::ListCollections, filter).map_err(|e| {
            MixologyError::RactorError(format!("StoreActor ListCollections RPC failed: {e}"))
        })?
    }

    /// Inserts a collection. An `owner` that does not exist leaves the collection unowned.
    pub async fn create_collection(
        &self,
        name: &str,
        owner: Option<&str>,
    ) -> Result<(), MixologyError> {
        ractor::call!(
            self.actor,
            StoreMessage::CreateCollection,
            name.to_string(),
            owner.map(str::to_string)
        )
        .map_err(|e| {
            MixologyError::RactorError(format!("StoreActor CreateCollection RPC failed: {e}"))
        })?
    }

    /// Deletes every collection with this name. Member items are kept.
    pub async fn delete_collections_named(&self, name: &str) -> Result<u64, MixologyError> {
        ractor::call!(
            self.actor,
            StoreMessage::DeleteCollectionsNamed,
            name.to_string()
        )
        .map_err(|e| {
            MixologyError::RactorError(format!("StoreActor DeleteCollectionsNamed RPC failed: {e}"))
        })?
    }

    /// Adds `item` to `collection`, creating the item if needed.
    ///
    /// Fails with `NotFound` when the collection does not exist; in that case
    /// no item is created.
    pub async fn link_item_to_collection(
        &self,
        item: &str,
        collection: &str,
    ) -> Result<(), MixologyError> {
        ractor::call!(
            self.actor,
            StoreMessage::Link,
            item.to_string(),
            collection.to_string()
        )
        .map_err(|e| MixologyError::RactorError(format!("StoreActor Link RPC failed: {e}")))?
    }

    /// Removes `item` from `collection`; both must exist, the edge need not.
    pub async fn unlink_item_from_collection(
        &self,
        item: &str,
        collection: &str,
    ) -> Result<(), MixologyError> {
        ractor::call!(
            self.actor,
            StoreMessage::Unlink,
            item.to_string(),
            collection.to_string()
        )
        .map_err(|e| MixologyError::RactorError(format!("StoreActor Unlink RPC failed: {e}")))?
    }

    /// Stops the actor after the queued messages and closes the pool.
    pub async fn shutdown(self) -> Result<(), MixologyError> {
        self.actor
            .stop_and_wait(None, None)
            .await
            .map_err(|e| MixologyError::RactorError(format!("StoreActor shutdown failed: {e}")))
    }
}

struct StoreActorState {
    pool: SqlitePool,
}

struct StoreActor;

#[ractor::async_trait]
impl Actor for StoreActor {
    type Msg = StoreMessage;
    type State = StoreActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        // The actor never runs two statements at once, so one connection is
        // enough and keeps `sqlite::memory:` databases coherent.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!(database_url = %database_url, "StoreActor initialized");
        Ok(StoreActorState { pool })
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        state.pool.close().await;
        info!("StoreActor stopped");
        Ok(())
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let pool = &state.pool;
        match message {
            StoreMessage::ListOwners(reply) => {
                let _ = reply.send(self.list_owners(pool).await);
            }
            StoreMessage::CreateOwner(name, unique, reply) => {
                let _ = reply.send(self.create_owner(pool, &name, unique).await);
            }
            StoreMessage::DeleteOwnersNamed(name, reply) => {
                let _ = reply.send(self.delete_owners_named(pool, &name).await);
            }
            StoreMessage::ListItems(reply) => {
                let _ = reply.send(self.list_items(pool).await);
            }
            StoreMessage::CreateItem(name, reply) => {
                let _ = reply.send(self.create_item(pool, &name).await);
            }
            StoreMessage::DeleteItemsNamed(name, reply) => {
                let _ = reply.send(self.delete_items_named(pool, &name).await);
            }
            StoreMessage::ListCollections(filter, reply) => {
                let _ = reply.send(self.list_collections(pool, &filter).await);
            }
            StoreMessage::CreateCollection(name, owner, reply) => {
                let res = self.create_collection(pool, &name, owner.as_deref()).await;
                let _ = reply.send(res);
            }
            StoreMessage::DeleteCollectionsNamed(name, reply) => {
                let _ = reply.send(self.delete_collections_named(pool, &name).await);
            }
            StoreMessage::Link(item, collection, reply) => {
                let _ = reply.send(self.link(pool, &item, &collection).await);
            }
            StoreMessage::Unlink(item, collection, reply) => {
                let _ = reply.send(self.unlink(pool, &item, &collection).await);
            }
        }
        Ok(())
    }
}

impl StoreActor {
    async fn list_owners(&self, pool: &SqlitePool) -> Result<Vec<OwnerSnapshot>, MixologyError> {
        let mut conn = pool.acquire().await?;
        let owners = queries::fetch_owners(&mut conn).await?;
        let collections = queries::find_owned_collections(&mut conn).await?;
        let memberships = queries::fetch_memberships(&mut conn).await?;

        debug!(count = owners.len(), "[Store] Fetched owners");
        Ok(GraphRows::new(&memberships).owners(&owners, &collections))
    }

    async fn create_owner(
        &self,
        pool: &SqlitePool,
        name: &str,
        unique: bool,
    ) -> Result<(), MixologyError> {
        let mut tx = pool.begin().await?;
        if unique && !queries::find_owners_by_name(&mut tx, name).await?.is_empty() {
            return Err(MixologyError::DuplicateKey {
                kind: "owner",
                name: name.to_string(),
            });
        }
        let id = queries::insert_owner(&mut tx, name).await?;
        tx.commit().await?;

        info!(owner.id = id, owner.name = %name, "[Store] Owner created");
        Ok(())
    }

    async fn delete_owners_named(&self, pool: &SqlitePool, name: &str) -> Result<u64, MixologyError> {
        let mut tx = pool.begin().await?;
        let removed = queries::delete_owners_named(&mut tx, name).await?;
        tx.commit().await?;

        info!(owner.name = %name, removed, "[Store] Owners deleted");
        Ok(removed)
    }

    async fn list_items(&self, pool: &SqlitePool) -> Result<Vec<ItemSnapshot>, MixologyError> {
        let mut conn = pool.acquire().await?;
        let items = queries::fetch_items(&mut conn).await?;
        let memberships = queries::fetch_memberships(&mut conn).await?;

        debug!(count = items.len(), "[Store] Fetched items");
        Ok(GraphRows::new(&memberships).items(&items))
    }

    async fn create_item(&self, pool: &SqlitePool, name: &str) -> Result<(), MixologyError> {
        let mut tx = pool.begin().await?;
        let id = queries::insert_item(&mut tx, name).await?;
        tx.commit().await?;

        info!(item.id = id, item.name = %name, "[Store] Item created");
        Ok(())
    }

    async fn delete_items_named(&self, pool: &SqlitePool, name: &str) -> Result<u64, MixologyError> {
        let mut tx = pool.begin().await?;
        let removed = queries::delete_items_named(&mut tx, name).await?;
        tx.commit().await?;

        info!(item.name = %name, removed, "[Store] Items deleted");
        Ok(removed)
    }

    async fn list_collections(
        &self,
        pool: &SqlitePool,
        filter: &OwnerFilter,
    ) -> Result<Vec<CollectionSnapshot>, MixologyError> {
        let mut conn = pool.acquire().await?;
        let collections = match filter {
            OwnerFilter::Owner(owner) => queries::find_collections_by_owner(&mut conn, owner).await?,
            OwnerFilter::Unowned => queries::find_unowned_collections(&mut conn).await?,
            OwnerFilter::All => queries::find_all_collections(&mut conn).await?,
        };
        let memberships = queries::fetch_memberships(&mut conn).await?;

        debug!(filter = ?filter, count = collections.len(), "[Store] Fetched collections");
        Ok(GraphRows::new(&memberships).collections(&collections))
    }

    async fn create_collection(
        &self,
        pool: &SqlitePool,
        name: &str,
        owner: Option<&str>,
    ) -> Result<(), MixologyError> {
        let mut tx = pool.begin().await?;
        let owner_id = match owner {
            Some(owner_name) => {
                let found = queries::find_owners_by_name(&mut tx, owner_name).await?;
                if found.is_empty() {
                    warn!(
                        collection.name = %name,
                        owner.name = %owner_name,
                        "[Store] Owner not found, collection left unowned"
                    );
                }
                found.first().map(|o| o.id)
            }
            None => None,
        };
        let id = queries::insert_collection(&mut tx, name, owner_id).await?;
        tx.commit().await?;

        info!(
            collection.id = id,
            collection.name = %name,
            owner.id = ?owner_id,
            "[Store] Collection created"
        );
        Ok(())
    }

    async fn delete_collections_named(
        &self,
        pool: &SqlitePool,
        name: &str,
    ) -> Result<u64, MixologyError> {
        let mut tx = pool.begin().await?;
        let removed = queries::delete_collections_named(&mut tx, name).await?;
        tx.commit().await?;

        info!(collection.name = %name, removed, "[Store] Collections deleted");
        Ok(removed)
    }

    async fn link(&self, pool: &SqlitePool, item: &str, collection: &str) -> Result<(), MixologyError> {
        let mut tx = pool.begin().await?;

        // Resolve the collection before touching items so a missing collection
        // leaves no freshly created item behind.
        let Some(target) = queries::find_collections_by_name(&mut tx, collection)
            .await?
            .into_iter()
            .next()
        else {
            warn!(item.name = %item, collection.name = %collection, "[Store] Link target not found");
            return Err(MixologyError::not_found("collection", collection));
        };

        let item_id = match queries::find_items_by_name(&mut tx, item).await?.first() {
            Some(found) => found.id,
            None => {
                let id = queries::insert_item(&mut tx, item).await?;
                info!(item.id = id, item.name = %item, "[Store] Item not found, created it");
                id
            }
        };

        if queries::has_member_named(&mut tx, target.id, item).await? {
            debug!(item.name = %item, collection.name = %collection, "[Store] Already linked");
        } else {
            queries::insert_membership(&mut tx, target.id, item_id).await?;
        }
        tx.commit().await?;

        info!(item.name = %item, collection.name = %collection, "[Store] Item linked");
        Ok(())
    }

    async fn unlink(
        &self,
        pool: &SqlitePool,
        item: &str,
        collection: &str,
    ) -> Result<(), MixologyError> {
        let mut tx = pool.begin().await?;

        let Some(target) = queries::find_collections_by_name(&mut tx, collection)
            .await?
            .into_iter()
            .next()
        else {
            warn!(item.name = %item, collection.name = %collection, "[Store] Unlink target not found");
            return Err(MixologyError::not_found("collection", collection));
        };
        if queries::find_items_by_name(&mut tx, item).await?.is_empty() {
            warn!(item.name = %item, collection.name = %collection, "[Store] Unlink item not found");
            return Err(MixologyError::not_found("item", item));
        }

        let removed = queries::delete_members_named(&mut tx, target.id, item).await?;
        tx.commit().await?;

        info!(
            item.name = %item,
            collection.name = %collection,
            removed,
            "[Store] Item unlinked"
        );
        Ok(())
    }
}

/// Spawn the store actor and return a cloneable handle.
///
/// Spawn once per database and share the handle; a second actor on the same
/// file would not be ordered with the first.
pub async fn spawn(database_url: &str) -> Result<StoreHandle, MixologyError> {
    let (actor, _jh) = Actor::spawn(None, StoreActor, database_url.to_string())
        .await
        .map_err(|e| MixologyError::RactorError(format!("failed to spawn StoreActor: {e}")))?;

    Ok(StoreHandle { actor })
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), MixologyError> {
    sqlx::raw_sql(SQLITE_INIT).execute(pool).await?;
    Ok(())
}
