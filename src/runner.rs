//! Navigation script runner.
//!
//! Drives an [`AppShell`] over the in-memory DOM from parsed script events and
//! writes one line per observable change: frames, scroll restorations, saved
//! offsets and announcements.

use crate::announce::SharedLiveRegion;
use crate::dom::{Document, DomNode, Element, ElementSpec, Overflow};
use crate::model::route_meta::pattern_matches;
use crate::model::{RouteKey, RouteMeta, RouteMetadataProvider, RouteTable, RouterEvent};
use crate::scroll::{DomWalkLocator, RestoreOutcome};
use crate::shell::{AppShell, ShellConfig, ShellFrame};
use crate::skeleton::{BlockSkeleton, FlakySkeleton, SkeletonComponent, SkeletonRef};
use crate::source::ScriptEvent;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Route table the runner can extend while the shell holds it.
#[derive(Debug, Clone, Default)]
struct SharedRoutes(Rc<RefCell<RouteTable>>);

impl RouteMetadataProvider for SharedRoutes {
    fn meta(&self, key: &RouteKey) -> RouteMeta {
        self.0.borrow().meta(key)
    }
}

#[derive(Debug, Clone, Copy)]
struct PageGeometry {
    page_height: f64,
    viewport_height: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_height: 2000.0,
            viewport_height: 600.0,
        }
    }
}

/// Counts reported after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub events: usize,
    pub navigations: usize,
    pub restorations: usize,
}

pub struct ScriptRunner<W: Write> {
    shell: AppShell<Element>,
    routes: SharedRoutes,
    geometry: Vec<(String, PageGeometry)>,
    skeletons: HashMap<String, Rc<FlakySkeleton<BlockSkeleton>>>,
    region: SharedLiveRegion,
    page: Option<Document>,
    start: Instant,
    last_at: u64,
    last_frame: Option<String>,
    summary: RunSummary,
    out: W,
}

impl<W: Write> ScriptRunner<W> {
    /// Shell idle at `/`, with script time zero at `start`.
    pub fn new(config: ShellConfig, start: Instant, out: W) -> Self {
        let routes = SharedRoutes::default();
        let region = SharedLiveRegion::new(config.announcement_clear);
        let shell = AppShell::new(
            config,
            RouteKey::root(),
            routes.clone(),
            DomWalkLocator,
            region.clone(),
        );
        Self {
            shell,
            routes,
            geometry: Vec::new(),
            skeletons: HashMap::new(),
            region,
            page: None,
            start,
            last_at: 0,
            last_frame: None,
            summary: RunSummary::default(),
            out,
        }
    }

    /// Apply every event in order.
    ///
    /// # Errors
    ///
    /// Only output failures are returned; shell operations never fail.
    pub fn run(mut self, events: impl IntoIterator<Item = ScriptEvent>) -> io::Result<RunSummary> {
        for event in events {
            self.apply(event)?;
        }
        self.out.flush()?;
        Ok(self.summary)
    }

    /// Apply one event.
    pub fn apply(&mut self, event: ScriptEvent) -> io::Result<()> {
        let at = self.clock(event.at_ms());
        let now = self.start + Duration::from_millis(at);
        self.summary.events += 1;

        let frame = match event {
            ScriptEvent::Route {
                pattern,
                no_scroll,
                scroll_restoration,
                skeleton,
                skeleton_lines,
                page_height,
                viewport_height,
                ..
            } => {
                let skeleton = skeleton.map(|id| self.skeleton_ref(id, skeleton_lines));
                self.routes.0.borrow_mut().insert(
                    pattern.clone(),
                    RouteMeta {
                        no_scroll,
                        scroll_restoration,
                        skeleton,
                    },
                );
                self.set_geometry(
                    pattern,
                    PageGeometry {
                        page_height,
                        viewport_height,
                    },
                );
                None
            }
            ScriptEvent::Navigate { to, action, .. } => {
                self.summary.navigations += 1;
                self.page = None;
                Some(
                    self.shell
                        .handle_router_event(RouterEvent::NavigationStarted { to, action }, now),
                )
            }
            ScriptEvent::RouterState { state, .. } => {
                Some(self.shell.handle_router_event(RouterEvent::StateChanged(state), now))
            }
            ScriptEvent::Settle { to, .. } => {
                let to = to.unwrap_or_else(|| self.shell.transition_state().current_path.clone());
                Some(self.shell.handle_router_event(RouterEvent::NavigationSettled { to }, now))
            }
            ScriptEvent::Scroll { offset, .. } => {
                self.scroll(offset, now, at)?;
                None
            }
            ScriptEvent::PageLoading { route, loading, .. } => {
                Some(self.shell.set_page_loading(route, loading, now))
            }
            ScriptEvent::SkeletonFailures { skeleton, count, .. } => {
                match self.skeletons.get(&skeleton) {
                    Some(component) => component.fail_next(count),
                    None => warn!(skeleton, "Failures queued for undeclared skeleton"),
                }
                None
            }
            ScriptEvent::Tick { .. } => Some(self.shell.tick(now)),
        };

        if let Some(frame) = frame {
            self.observe(frame, now, at)?;
        }
        self.flush_announcements(at)
    }

    fn clock(&mut self, at_ms: u64) -> u64 {
        if at_ms < self.last_at {
            warn!(at_ms, last = self.last_at, "Script time went backwards, holding clock");
        }
        self.last_at = self.last_at.max(at_ms);
        self.last_at
    }

    fn skeleton_ref(&mut self, id: String, lines: usize) -> SkeletonRef {
        let component = self
            .skeletons
            .entry(id.clone())
            .or_insert_with(|| Rc::new(FlakySkeleton::new(id.clone(), BlockSkeleton::new(lines), 0)));
        let shared: Rc<dyn SkeletonComponent> = component.clone();
        SkeletonRef::shared(id, shared)
    }

    fn set_geometry(&mut self, pattern: String, geometry: PageGeometry) {
        if let Some(slot) = self.geometry.iter_mut().find(|(p, _)| *p == pattern) {
            slot.1 = geometry;
        } else {
            self.geometry.push((pattern, geometry));
        }
    }

    fn geometry_for(&self, key: &RouteKey) -> PageGeometry {
        self.geometry
            .iter()
            .find(|(pattern, _)| pattern_matches(pattern, key.pathname()))
            .map(|(_, g)| *g)
            .unwrap_or_default()
    }

    fn build_page(&self, key: &RouteKey) -> Document {
        let geometry = self.geometry_for(key);
        Document::build(
            ElementSpec::new("body")
                .heights(geometry.viewport_height, geometry.viewport_height)
                .child(
                    ElementSpec::new("main")
                        .id("content")
                        .primary()
                        .heights(geometry.page_height, geometry.viewport_height)
                        .overflow(Overflow::Auto),
                ),
        )
    }

    /// Print the frame if it changed and mount content when it appears.
    fn observe(&mut self, mut frame: ShellFrame, now: Instant, at: u64) -> io::Result<()> {
        if let ShellFrame::Content { key, .. } = &frame {
            if self.shell.mounted().is_none() {
                let key = key.clone();
                self.emit_frame(&frame, at)?;
                let page = self.build_page(&key);
                if let Some(outcome) = self.shell.content_mounted(&page.root(), now) {
                    self.summary.restorations += 1;
                    self.emit_restore(&key, outcome, at)?;
                }
                self.page = Some(page);
                frame = self.shell.frame();
            }
        } else {
            self.page = None;
        }
        self.emit_frame(&frame, at)
    }

    fn scroll(&mut self, offset: f64, now: Instant, at: u64) -> io::Result<()> {
        let Some(element) = self.page.as_ref().and_then(|p| p.get_element_by_id("content")) else {
            debug!(offset, "Scroll with no mounted page ignored");
            return Ok(());
        };
        if let Err(error) = element.scroll_to(offset) {
            warn!(%error, "Scripted scroll failed");
            return Ok(());
        }
        self.shell.on_scroll(now);
        let Some(key) = self.shell.mounted().cloned() else {
            return Ok(());
        };
        let actual = element.scroll_top().unwrap_or(offset);
        writeln!(
            self.out,
            "[{at:>6}ms] scroll {key} top={actual} saved={}",
            self.shell.scroll_store().get(&key)
        )
    }

    fn emit_frame(&mut self, frame: &ShellFrame, at: u64) -> io::Result<()> {
        let line = match frame {
            ShellFrame::Skeleton { key, placeholder } => format!(
                "frame skeleton {key} strategy={} role={}",
                placeholder.strategy, placeholder.role
            ),
            ShellFrame::Content { key, direction } => {
                format!("frame content {key} direction={direction}")
            }
        };
        if self.last_frame.as_deref() == Some(line.as_str()) {
            return Ok(());
        }
        writeln!(self.out, "[{at:>6}ms] {line}")?;
        self.last_frame = Some(line);
        Ok(())
    }

    fn emit_restore(&mut self, key: &RouteKey, outcome: RestoreOutcome, at: u64) -> io::Result<()> {
        let detail = match outcome {
            RestoreOutcome::Explicit(offset) => format!("offset={offset} (explicit)"),
            RestoreOutcome::Restored(offset) => format!("offset={offset} (restored)"),
            RestoreOutcome::Top => "offset=0 (top)".to_string(),
            RestoreOutcome::Skipped(reason) => format!("skipped ({reason:?})"),
        };
        writeln!(self.out, "[{at:>6}ms] restore {key} {detail}")
    }

    fn flush_announcements(&mut self, at: u64) -> io::Result<()> {
        for message in self.region.take_messages() {
            writeln!(self.out, "[{at:>6}ms] announce \"{message}\"")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parse_script;

    fn run(script: &str) -> (String, RunSummary) {
        let lines: Vec<&str> = script.lines().collect();
        let (events, errors) = parse_script(&lines);
        assert!(errors.is_empty(), "script errors: {errors:?}");
        let mut out = Vec::new();
        let summary = ScriptRunner::new(ShellConfig::default(), Instant::now(), &mut out)
            .run(events)
            .unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn back_navigation_restores_scrolled_offset() {
        let (out, summary) = run(r#"
{"event":"navigate","at_ms":0,"to":"/a"}
{"event":"settle","at_ms":5}
{"event":"navigate","at_ms":10,"to":"/b"}
{"event":"settle","at_ms":15}
{"event":"scroll","at_ms":20,"offset":300}
{"event":"navigate","at_ms":30,"to":"/c"}
{"event":"navigate","at_ms":40,"to":"/b","action":"pop"}
"#);
        assert!(out.contains("restore /b offset=0 (top)"), "{out}");
        assert!(out.contains("restore /b offset=300 (restored)"), "{out}");
        assert!(out.contains("frame content /b direction=backward"), "{out}");
        assert_eq!(summary.navigations, 4);
        assert_eq!(summary.restorations, 4);
    }

    #[test]
    fn skeleton_route_shows_placeholder_then_content() {
        let (out, _) = run(r#"
{"event":"route","at_ms":0,"pattern":"/list","skeleton":"list"}
{"event":"navigate","at_ms":0,"to":"/list"}
{"event":"tick","at_ms":1}
{"event":"settle","at_ms":50}
{"event":"tick","at_ms":250}
"#);
        assert!(out.contains("frame skeleton /list strategy=fallback role=status"), "{out}");
        assert!(out.contains("frame skeleton /list strategy=animated"), "{out}");
        assert!(out.contains("frame content /list direction=forward"), "{out}");
        assert!(out.contains("announce \"Loading content\""), "{out}");
        assert!(out.contains("announce \"Content loaded\""), "{out}");
    }

    #[test]
    fn queued_failures_walk_the_ladder() {
        let (out, _) = run(r#"
{"event":"route","at_ms":0,"pattern":"/grid","skeleton":"grid"}
{"event":"skeleton_failures","at_ms":0,"skeleton":"grid","count":4}
{"event":"navigate","at_ms":0,"to":"/grid"}
{"event":"tick","at_ms":1}
"#);
        let last_frame = out
            .lines()
            .filter(|l| l.contains("frame skeleton"))
            .last()
            .unwrap_or_default();
        assert!(last_frame.contains("strategy=fallback"), "{out}");
    }

    #[test]
    fn route_override_lands_at_explicit_offset() {
        let (out, _) = run(r#"
{"event":"route","at_ms":0,"pattern":"/checkout","scroll_restoration":0}
{"event":"navigate","at_ms":0,"to":"/checkout"}
{"event":"scroll","at_ms":10,"offset":800}
{"event":"navigate","at_ms":20,"to":"/a"}
{"event":"navigate","at_ms":30,"to":"/checkout","action":"pop"}
"#);
        assert_eq!(out.matches("restore /checkout offset=0 (explicit)").count(), 2, "{out}");
        assert!(out.contains("scroll /checkout top=800 saved=800"), "{out}");
    }

    #[test]
    fn late_settle_for_earlier_destination_keeps_skeleton() {
        let (out, _) = run(r#"
{"event":"route","at_ms":0,"pattern":"/list","skeleton":"list"}
{"event":"navigate","at_ms":0,"to":"/b"}
{"event":"navigate","at_ms":10,"to":"/list"}
{"event":"tick","at_ms":11}
{"event":"settle","at_ms":300,"to":"/b"}
"#);
        assert!(out.contains("frame skeleton /list"), "{out}");
        assert!(!out.contains("frame content /list"), "{out}");

        let (out, _) = run(r#"
{"event":"route","at_ms":0,"pattern":"/list","skeleton":"list"}
{"event":"navigate","at_ms":0,"to":"/b"}
{"event":"navigate","at_ms":10,"to":"/list"}
{"event":"tick","at_ms":11}
{"event":"settle","at_ms":300,"to":"/b"}
{"event":"settle","at_ms":320}
"#);
        assert!(out.contains("frame content /list direction=forward"), "{out}");
    }

    #[test]
    fn announcements_are_written_once() {
        let (out, _) = run(r#"
{"event":"navigate","at_ms":0,"to":"/a"}
{"event":"settle","at_ms":5}
{"event":"navigate","at_ms":10,"to":"/b"}
{"event":"settle","at_ms":15}
"#);
        assert_eq!(out.matches("announce \"Content loaded\"").count(), 2, "{out}");
    }

    #[test]
    fn short_page_has_nothing_to_restore() {
        let (out, _) = run(r#"
{"event":"route","at_ms":0,"pattern":"/short","page_height":400,"viewport_height":600}
{"event":"navigate","at_ms":0,"to":"/short"}
"#);
        assert!(out.contains("restore /short skipped (NoScrollContainer)"), "{out}");
    }
}
