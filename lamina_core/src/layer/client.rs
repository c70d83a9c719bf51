// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Client-owned layers and the handles clients hold to them.
//!
//! The owning compositor decides what happens when a client lets go of a
//! layer. It registers that decision as a hook when the handle is created;
//! the hook runs exactly once, when the last clone of the handle is
//! released with [`SurfaceHandle::release`].

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;
use core::ops::{Deref, DerefMut};

use super::base::Layer;
use super::id::{ClientId, LayerId};
use crate::content::PlainContent;

/// A layer created on behalf of a client connection.
#[derive(Debug)]
pub struct ClientLayer<C = PlainContent> {
    layer: Layer<C>,
    client: ClientId,
    has_surface: bool,
}

impl<C> ClientLayer<C> {
    /// Wraps `layer` as owned by `client`.
    #[must_use]
    pub fn new(layer: Layer<C>, client: ClientId) -> Self {
        Self {
            layer,
            client,
            has_surface: false,
        }
    }

    /// The owning client.
    #[inline]
    #[must_use]
    pub fn client(&self) -> ClientId {
        self.client
    }

    /// Whether [`surface`](Self::surface) has been called.
    #[inline]
    #[must_use]
    pub fn has_surface(&self) -> bool {
        self.has_surface
    }

    /// Creates the client's handle to this layer.
    ///
    /// `on_release` runs with the layer id once the last clone of the
    /// returned handle has been released.
    ///
    /// # Panics
    ///
    /// Panics if called more than once.
    pub fn surface<F>(&mut self, on_release: F) -> SurfaceHandle
    where
        F: FnOnce(LayerId) + Send + Sync + 'static,
    {
        assert!(!self.has_surface, "surface() has already been called");
        self.has_surface = true;
        SurfaceHandle {
            shared: Arc::new(SurfaceShared {
                layer: self.layer.id(),
                on_release: Box::new(on_release),
            }),
        }
    }

    /// Splits the wrapper so the owner can drop its client bookkeeping.
    #[must_use]
    pub fn detach(self) -> (ClientId, Layer<C>) {
        (self.client, self.layer)
    }
}

impl<C> Deref for ClientLayer<C> {
    type Target = Layer<C>;

    fn deref(&self) -> &Layer<C> {
        &self.layer
    }
}

impl<C> DerefMut for ClientLayer<C> {
    fn deref_mut(&mut self) -> &mut Layer<C> {
        &mut self.layer
    }
}

struct SurfaceShared {
    layer: LayerId,
    on_release: Box<dyn FnOnce(LayerId) + Send + Sync>,
}

/// A client's reference to a layer.
///
/// Clones share one release hook.
#[derive(Clone)]
pub struct SurfaceHandle {
    shared: Arc<SurfaceShared>,
}

impl SurfaceHandle {
    /// The layer this handle refers to.
    #[must_use]
    pub fn layer(&self) -> LayerId {
        self.shared.layer
    }

    /// Gives up this reference.
    ///
    /// Returns `true` if this was the last one, in which case the release
    /// hook has run.
    pub fn release(self) -> bool {
        match Arc::into_inner(self.shared) {
            Some(shared) => {
                (shared.on_release)(shared.layer);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceHandle")
            .field("layer", &self.shared.layer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use core::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::layer::CreationFlags;

    fn client_layer() -> ClientLayer {
        ClientLayer::new(Layer::new(10, 10, CreationFlags::empty()), ClientId(3))
    }

    #[test]
    fn hook_fires_once_after_last_release() {
        let released = Arc::new(AtomicU32::new(0));
        let mut layer = client_layer();
        let expected = layer.id();

        let seen = Arc::clone(&released);
        let handle = layer.surface(move |id| {
            assert_eq!(id, expected, "hook receives the layer id");
            seen.fetch_add(1, Ordering::Relaxed);
        });
        let other = handle.clone();
        assert_eq!(other.layer(), expected);

        assert!(!handle.release());
        assert_eq!(released.load(Ordering::Relaxed), 0);
        assert!(other.release());
        assert_eq!(released.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn release_from_another_thread() {
        let released = Arc::new(AtomicU32::new(0));
        let mut layer = client_layer();
        let seen = Arc::clone(&released);
        let handle = layer.surface(move |_| {
            seen.fetch_add(1, Ordering::Relaxed);
        });
        let other = handle.clone();
        let last = std::thread::spawn(move || other.release())
            .join()
            .expect("release thread panicked");
        assert!(!last, "the local clone is still alive");
        assert!(handle.release());
        assert_eq!(released.load(Ordering::Relaxed), 1);
    }

    #[test]
    #[should_panic(expected = "surface() has already been called")]
    fn second_surface_panics() {
        let mut layer = client_layer();
        let _first = layer.surface(|_| {});
        let _second = layer.surface(|_| {});
    }

    #[test]
    fn wrapper_derefs_to_layer() {
        let mut layer = client_layer();
        assert!(layer.set_alpha(10));
        assert_eq!(layer.current_state().alpha, 10);
        let id = layer.id();
        let (client, inner) = layer.detach();
        assert_eq!(client, ClientId(3));
        assert_eq!(inner.id(), id);
    }
}
