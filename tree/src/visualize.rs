//! Textual tree dumps.

use std::fmt;
use std::io::{Result, Write};

use ternvis_types::NodeId;
use ternvis_visualize::{visualize_to_vec, Drawer, Visualize};

use crate::TwoThreeTree;

impl Visualize for TwoThreeTree {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> Result<Drawer<W>> {
        drawer.write(b"tree root: ")?;
        match self.root() {
            None => {
                drawer.write(b"empty")?;
                Ok(drawer)
            }
            Some(root) => self.visualize_node(root, drawer),
        }
    }
}

impl TwoThreeTree {
    fn visualize_node<W: Write>(&self, id: NodeId, mut drawer: Drawer<W>) -> Result<Drawer<W>> {
        let node = self.arena().node(id);
        drawer.write(format!("[{id} keys: ").as_bytes())?;
        drawer = node.keys.as_slice().visualize(drawer)?;
        drawer.write(b"]")?;
        if !node.is_leaf() {
            drawer.down();
            for child in &node.children {
                drawer.write(b"\n")?;
                drawer = self.visualize_node(*child, drawer)?;
            }
            drawer.up();
        }
        Ok(drawer)
    }
}

impl fmt::Debug for TwoThreeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = Vec::new();
        visualize_to_vec(&mut out, self);
        f.write_str(&String::from_utf8_lossy(&out))
    }
}
