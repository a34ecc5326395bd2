//! Shopping cart store.
//!
//! A single cart is shared by every view. It lives in a [`CartRepository`]
//! slot and is read-modify-written in full on each mutation. Mutations are
//! serialized by an async mutex so concurrent handlers cannot create two
//! entries for the same product.
//!
//! After a successful write the store broadcasts [`CartChanged`] and
//! publishes a short-lived confirmation [`Notice`].

pub mod repository;

pub use repository::{
    CART_STORAGE_KEY, CartRepository, FileCartRepository, MemoryCartRepository, PersistenceError,
};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use catfood_core::{Price, Product, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::{Mutex, broadcast, watch};
use tracing::instrument;

/// How long a confirmation notice stays visible.
pub const NOTICE_DURATION: Duration = Duration::from_secs(2);

const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(flatten)]
    pub product: Product,
    #[serde(deserialize_with = "positive_quantity")]
    pub quantity: u32,
}

fn positive_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match u32::deserialize(deserializer)? {
        0 => Err(serde::de::Error::custom("cart quantity must be positive")),
        quantity => Ok(quantity),
    }
}

impl CartEntry {
    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}

/// Ordered cart entries, at most one per product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Add one unit of `product`, returning the updated entry's quantity.
    pub fn add(&mut self, product: &Product) -> u32 {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.product.id == product.id) {
            entry.quantity = entry.quantity.saturating_add(1);
            return entry.quantity;
        }
        self.entries.push(CartEntry {
            product: product.clone(),
            quantity: 1,
        });
        1
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// The entry for `id`, if present.
    #[must_use]
    pub fn entry(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.product.id == id)
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total units across all entries (the badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.entries
            .iter()
            .fold(0, |count, e| count.saturating_add(e.quantity))
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }
}

/// Payload-free "cart changed" signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartChanged;

/// Transient confirmation shown after adding to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    #[serde(skip)]
    seq: u64,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Result of [`CartStore::add_to_cart`].
#[derive(Debug, Clone)]
pub struct CartUpdate {
    /// The cart after the mutation.
    pub cart: Cart,
    /// Quantity of the added product after the mutation.
    pub quantity: u32,
    /// `false` when the write failed and the change lives only in `cart`.
    pub persisted: bool,
    /// The confirmation published for this add.
    pub notice: Notice,
}

/// Process-wide cart service.
///
/// Cheaply cloneable via `Arc`; clones share the slot, lock and channels.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    repository: Arc<dyn CartRepository>,
    write_lock: Mutex<()>,
    changes: broadcast::Sender<CartChanged>,
    notice: watch::Sender<Option<Notice>>,
    notice_seq: AtomicU64,
    notice_duration: Duration,
}

impl CartStore {
    /// Create a store over `repository`.
    #[must_use]
    pub fn new(repository: Arc<dyn CartRepository>) -> Self {
        Self::with_notice_duration(repository, NOTICE_DURATION)
    }

    /// Create a store whose notices clear after `notice_duration`.
    #[must_use]
    pub fn with_notice_duration(
        repository: Arc<dyn CartRepository>,
        notice_duration: Duration,
    ) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        let (notice, _) = watch::channel(None);
        Self {
            inner: Arc::new(CartStoreInner {
                repository,
                write_lock: Mutex::new(()),
                changes,
                notice,
                notice_seq: AtomicU64::new(0),
                notice_duration,
            }),
        }
    }

    /// Read the current cart.
    ///
    /// Unreadable or corrupt storage is logged and read as an empty cart.
    pub async fn cart(&self) -> Cart {
        match self.inner.repository.load().await {
            Ok(cart) => cart,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart, treating as empty");
                Cart::default()
            }
        }
    }

    /// Add one unit of `product` to the cart.
    ///
    /// A failed write is logged and reported via [`CartUpdate::persisted`];
    /// no change notification fires in that case.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_cart(&self, product: &Product) -> CartUpdate {
        let _guard = self.inner.write_lock.lock().await;

        let mut cart = self.cart().await;
        let quantity = cart.add(product);

        let persisted = match self.inner.repository.save(&cart).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist cart, change kept in memory only");
                false
            }
        };

        if persisted {
            // No subscribers is fine
            let _ = self.inner.changes.send(CartChanged);
            tracing::info!(quantity, "Added product to cart");
        }

        let notice = self.show_notice(format!("{} added to cart", product.name));

        CartUpdate {
            cart,
            quantity,
            persisted,
            notice,
        }
    }

    /// Subscribe to cart change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartChanged> {
        self.inner.changes.subscribe()
    }

    /// The confirmation notice currently visible, if any.
    #[must_use]
    pub fn current_notice(&self) -> Option<Notice> {
        self.inner.notice.borrow().clone()
    }

    fn show_notice(&self, message: String) -> Notice {
        let seq = self.inner.notice_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let notice = Notice {
            seq,
            message,
            created_at: Utc::now(),
        };
        self.inner.notice.send_replace(Some(notice.clone()));

        let store = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(store.inner.notice_duration).await;
            // Only clear our own notice, not one shown after it
            store.inner.notice.send_if_modified(|current| {
                if current.as_ref().is_some_and(|n| n.seq == seq) {
                    *current = None;
                    true
                } else {
                    false
                }
            });
        });

        notice
    }
}
