// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Content hosted by faces, and face materials.
//!
//! Content (furniture, fixtures, annotations) is owned by the host
//! application and identified here only by an opaque [`ContentId`]. The
//! kernel records which face hosts it so that merges and re-divisions can
//! move it onto the face that replaces its host.

use serde::{Deserialize, Serialize};

use crate::arena::TopologyArena;
use crate::error::{Error, Result};
use crate::keys::*;

/// Opaque identifier of a host-application entity placed on a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentId(pub u64);

impl TopologyArena {
    /// Places a content on a face. A content already hosted elsewhere moves.
    pub fn add_content(&mut self, host: FaceKey, content: ContentId) -> Result<()> {
        if !self.faces.contains_key(host) {
            return Err(Error::FaceNotFound(host));
        }
        self.remove_content(content);
        self.contents.entry(host).or_default().push(content);
        Ok(())
    }

    /// Returns the contents of a face.
    pub fn contents(&self, host: FaceKey) -> &[ContentId] {
        self.contents
            .get(&host)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the face hosting a content.
    pub fn host_of(&self, content: ContentId) -> Option<FaceKey> {
        for (&host, contents) in &self.contents {
            if contents.contains(&content) {
                return Some(host);
            }
        }
        None
    }

    /// Removes a content from whichever face hosts it.
    ///
    /// Returns the former host, if any.
    pub fn remove_content(&mut self, content: ContentId) -> Option<FaceKey> {
        let host = self.host_of(content)?;
        if let Some(list) = self.contents.get_mut(&host) {
            list.retain(|&c| c != content);
            if list.is_empty() {
                self.contents.remove(&host);
            }
        }
        Some(host)
    }

    /// Moves every content of `from` onto `to`, keeping order.
    pub(crate) fn retarget_contents(&mut self, from: FaceKey, to: FaceKey) {
        if from == to {
            return;
        }
        if let Some(moved) = self.contents.remove(&from) {
            self.contents.entry(to).or_default().extend(moved);
        }
    }

    /// Sets or clears the material of a face.
    pub fn set_material(&mut self, face: FaceKey, material: Option<String>) -> Result<()> {
        let data = self.faces.get_mut(face).ok_or(Error::FaceNotFound(face))?;
        data.material = material;
        Ok(())
    }

    /// Returns the material of a face.
    pub fn material(&self, face: FaceKey) -> Option<&str> {
        self.faces.get(face)?.material.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::FaceKind;
    use crate::divide::LoopPoint;

    fn two_faces(arena: &mut TopologyArena) -> (FaceKey, FaceKey) {
        let square = |x0: f64| {
            vec![
                LoopPoint::new(x0, 0.0),
                LoopPoint::new(x0 + 1.0, 0.0),
                LoopPoint::new(x0 + 1.0, 1.0),
                LoopPoint::new(x0, 1.0),
            ]
        };
        let a = arena.divide_face(&square(0.0), &[], FaceKind::Floor)[0];
        let b = arena.divide_face(&square(5.0), &[], FaceKind::Floor)[0];
        (a, b)
    }

    #[test]
    fn add_and_query_content() {
        let mut arena = TopologyArena::new();
        let (a, _) = two_faces(&mut arena);

        arena.add_content(a, ContentId(1)).unwrap();
        arena.add_content(a, ContentId(2)).unwrap();

        assert_eq!(arena.contents(a), &[ContentId(1), ContentId(2)]);
        assert_eq!(arena.host_of(ContentId(2)), Some(a));
        assert_eq!(arena.host_of(ContentId(3)), None);
    }

    #[test]
    fn adding_to_another_face_moves_content() {
        let mut arena = TopologyArena::new();
        let (a, b) = two_faces(&mut arena);

        arena.add_content(a, ContentId(1)).unwrap();
        arena.add_content(b, ContentId(1)).unwrap();

        assert!(arena.contents(a).is_empty());
        assert_eq!(arena.host_of(ContentId(1)), Some(b));
    }

    #[test]
    fn retarget_moves_everything() {
        let mut arena = TopologyArena::new();
        let (a, b) = two_faces(&mut arena);
        arena.add_content(a, ContentId(1)).unwrap();
        arena.add_content(b, ContentId(2)).unwrap();

        arena.retarget_contents(a, b);

        assert!(arena.contents(a).is_empty());
        assert_eq!(arena.contents(b), &[ContentId(2), ContentId(1)]);
    }

    #[test]
    fn removing_face_drops_content() {
        let mut arena = TopologyArena::new();
        let (a, _) = two_faces(&mut arena);
        arena.add_content(a, ContentId(9)).unwrap();

        arena.remove_face(a).unwrap();
        assert_eq!(arena.host_of(ContentId(9)), None);
        assert!(arena.add_content(a, ContentId(9)).is_err());
    }

    #[test]
    fn material_round_trip() {
        let mut arena = TopologyArena::new();
        let (a, _) = two_faces(&mut arena);

        assert_eq!(arena.material(a), None);
        arena.set_material(a, Some("oak".to_string())).unwrap();
        assert_eq!(arena.material(a), Some("oak"));
        arena.set_material(a, None).unwrap();
        assert_eq!(arena.material(a), None);
    }
}
