use common::{
    CELL_PX, CannonGeometry, CannonOrigin, CellFrame, PlaybackFrame, PlaybackView, TankStat,
    Terrain,
};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement};

/// Page elements the visualizer draws into, handed over by the page script.
#[wasm_bindgen]
pub struct DomHandles {
    board: HtmlElement,
    step_display: Element,
    countdown_display: Element,
    action_log: Element,
    tank_list: Element,
    btn_first: HtmlButtonElement,
    btn_prev: HtmlButtonElement,
    btn_play: HtmlElement,
    btn_pause: HtmlElement,
    btn_next: HtmlButtonElement,
    btn_last: HtmlButtonElement,
}

#[wasm_bindgen]
impl DomHandles {
    #[wasm_bindgen(constructor)]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        board: HtmlElement,
        step_display: Element,
        countdown_display: Element,
        action_log: Element,
        tank_list: Element,
        btn_first: HtmlButtonElement,
        btn_prev: HtmlButtonElement,
        btn_play: HtmlElement,
        btn_pause: HtmlElement,
        btn_next: HtmlButtonElement,
        btn_last: HtmlButtonElement,
    ) -> DomHandles {
        DomHandles {
            board,
            step_display,
            countdown_display,
            action_log,
            tank_list,
            btn_first,
            btn_prev,
            btn_play,
            btn_pause,
            btn_next,
            btn_last,
        }
    }
}

/// CSS classes for one board cell.
pub fn cell_classes(cell: &CellFrame) -> Vec<String> {
    let mut classes = vec!["cell".to_string()];
    match cell.terrain {
        Terrain::Empty => {}
        Terrain::Wall { health } => {
            classes.push("wall".to_string());
            classes.push(format!("wall-health-{health}"));
        }
        Terrain::Mine => classes.push("mine".to_string()),
    }
    if let Some(tank) = cell.tank {
        classes.push(format!("tank{}", tank.player_id));
    }
    classes
}

/// Inline style for a tank barrel.
pub fn cannon_style(geometry: &CannonGeometry) -> String {
    let mut style = format!(
        "width: {}px; height: {}px; left: {}px; top: {}px;",
        geometry.width, geometry.height, geometry.left, geometry.top
    );
    if let Some(origin) = geometry.origin {
        let origin = match origin {
            CannonOrigin::LeftCenter => "left center",
            CannonOrigin::RightCenter => "right center",
        };
        style.push_str(&format!(
            " transform-origin: {origin}; transform: rotate({}deg);",
            geometry.rotation_deg
        ));
    }
    style
}

fn tank_status(stat: &TankStat) -> String {
    if stat.destroyed {
        "Destroyed".to_string()
    } else {
        format!("{} shells", stat.remaining_shells)
    }
}

pub struct DomView {
    document: Document,
    handles: DomHandles,
    cells: Vec<Element>,
}

impl DomView {
    /// Builds the `width x height` cell grid inside the board element.
    pub fn mount(
        document: Document,
        handles: DomHandles,
        width: usize,
        height: usize,
    ) -> Result<Self, JsValue> {
        let style = handles.board.style();
        style.set_property("grid-template-rows", &format!("repeat({height}, {CELL_PX}px)"))?;
        style.set_property("grid-template-columns", &format!("repeat({width}, {CELL_PX}px)"))?;

        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let cell = document.create_element("div")?;
                cell.set_class_name("cell");
                cell.set_attribute("data-x", &x.to_string())?;
                cell.set_attribute("data-y", &y.to_string())?;
                handles.board.append_child(&cell)?;
                cells.push(cell);
            }
        }

        Ok(Self {
            document,
            handles,
            cells,
        })
    }

    fn draw(&self, frame: &PlaybackFrame) -> Result<(), JsValue> {
        let board = &frame.board;

        for (x, y, cell_frame) in board.cells() {
            let Some(cell) = self.cells.get(y * board.width + x) else {
                continue;
            };
            cell.set_class_name(&cell_classes(cell_frame).join(" "));
            cell.set_inner_html("");

            if let Some(tank) = cell_frame.tank {
                let cannon = self.document.create_element("div")?;
                cannon.set_class_name("cannon");
                cannon.set_attribute(
                    "style",
                    &cannon_style(&CannonGeometry::for_direction(tank.direction, CELL_PX)),
                )?;
                cell.append_child(&cannon)?;
            }

            for owner in &cell_frame.shells {
                let shell = self.document.create_element("div")?;
                shell.set_class_name(&format!("shell shell{owner}"));
                cell.append_child(&shell)?;
            }
        }

        self.handles
            .step_display
            .set_text_content(Some(&frame.status.to_string()));

        let countdown = &self.handles.countdown_display;
        match frame.status.countdown {
            Some(remaining) => {
                countdown.set_text_content(Some(&format!("Countdown: {remaining}")));
                countdown.class_list().add_1("active")?;
            }
            None => {
                countdown.set_text_content(Some(""));
                countdown.class_list().remove_1("active")?;
            }
        }

        self.draw_tank_list(&frame.tanks)?;

        let log = &self.handles.action_log;
        log.set_inner_html("");
        if let Some(entry) = &frame.log {
            let line = self.document.create_element("div")?;
            line.set_text_content(Some(&entry.to_string()));
            log.append_child(&line)?;
        }

        let transport = frame.transport;
        self.handles.btn_first.set_disabled(!transport.first);
        self.handles.btn_prev.set_disabled(!transport.previous);
        self.handles.btn_next.set_disabled(!transport.next);
        self.handles.btn_last.set_disabled(!transport.last);
        Ok(())
    }

    fn draw_tank_list(&self, tanks: &[TankStat]) -> Result<(), JsValue> {
        let list = &self.handles.tank_list;
        list.set_inner_html("");

        for stat in tanks {
            let row = self.document.create_element("div")?;
            row.set_class_name(if stat.destroyed {
                "tank-info tank-destroyed"
            } else {
                "tank-info"
            });

            let color = self.document.create_element("div")?;
            color.set_class_name(&format!("tank-color tank{}", stat.player_id));

            let details = self.document.create_element("div")?;
            details.set_class_name("tank-details");
            let player = self.document.create_element("div")?;
            player.set_class_name("tank-player");
            player.set_text_content(Some(&format!("P{}", stat.player_id)));
            let status = self.document.create_element("div")?;
            status.set_class_name("tank-status");
            status.set_text_content(Some(&tank_status(stat)));
            details.append_child(&player)?;
            details.append_child(&status)?;

            row.append_child(&color)?;
            row.append_child(&details)?;
            list.append_child(&row)?;
        }
        Ok(())
    }
}

impl PlaybackView for DomView {
    fn render(&mut self, frame: &PlaybackFrame) {
        if let Err(err) = self.draw(frame) {
            log::error!("Failed to draw snapshot {}: {:?}", frame.index, err);
        }
    }

    fn set_playing(&mut self, playing: bool) {
        let (shown, hidden) = if playing {
            (&self.handles.btn_pause, &self.handles.btn_play)
        } else {
            (&self.handles.btn_play, &self.handles.btn_pause)
        };
        let result = hidden
            .style()
            .set_property("display", "none")
            .and_then(|_| shown.style().set_property("display", "inline-block"));
        if let Err(err) = result {
            log::error!("Failed to toggle play controls: {:?}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Direction, TankMarker};

    #[test]
    fn wall_cells_carry_health_tier() {
        let cell = CellFrame {
            terrain: Terrain::Wall { health: 1 },
            tank: None,
            shells: vec![],
        };
        assert_eq!(cell_classes(&cell), vec!["cell", "wall", "wall-health-1"]);
    }

    #[test]
    fn tank_class_follows_player() {
        let cell = CellFrame {
            terrain: Terrain::Empty,
            tank: Some(TankMarker {
                player_id: 7,
                direction: Direction::Down,
            }),
            shells: vec![1],
        };
        assert_eq!(cell_classes(&cell), vec!["cell", "tank7"]);
    }

    #[test]
    fn diagonal_cannon_is_rotated() {
        let style = cannon_style(&CannonGeometry::for_direction(Direction::UpLeft, CELL_PX));
        assert_eq!(
            style,
            "width: 21px; height: 4px; left: -6px; top: 13px; transform-origin: right center; transform: rotate(45deg);"
        );

        let straight = cannon_style(&CannonGeometry::for_direction(Direction::Right, CELL_PX));
        assert!(!straight.contains("transform"));
    }
}
