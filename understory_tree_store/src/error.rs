// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types surfaced by the store.

use core::fmt;

use alloc::boxed::Box;
use alloc::rc::Rc;

/// A [`TreeSource`](crate::TreeSource) fetch failed.
///
/// The source error is reference counted so that every caller sharing a
/// single in-flight refresh receives the same failure.
pub struct FetchError<E> {
    source: Rc<E>,
}

impl<E> FetchError<E> {
    pub(crate) fn new(source: E) -> Self {
        Self {
            source: Rc::new(source),
        }
    }

    /// Returns the error reported by the source.
    #[must_use]
    pub fn inner(&self) -> &E {
        &self.source
    }
}

impl<E> Clone for FetchError<E> {
    fn clone(&self) -> Self {
        Self {
            source: Rc::clone(&self.source),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for FetchError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FetchError {{ source: {:?} }}", self.source)
    }
}

impl<E: fmt::Display> fmt::Display for FetchError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fetching tree children failed: {}", self.source)
    }
}

impl<E: core::error::Error + 'static> core::error::Error for FetchError<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&*self.source)
    }
}

/// Failure reported by a pending drop handler.
///
/// Drop failures are logged and swallowed; the store resynchronizes by
/// refreshing the affected subtree.
pub type DropError = Box<dyn core::error::Error + 'static>;
