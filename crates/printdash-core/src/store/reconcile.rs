// ── Port reconciliation ──
//
// Pure in-memory merge of printer port reports into the registry. Runs
// under the dashboard lock during a poll cycle; has no failure mode.

use crate::model::port::{Port, PortKey, PortRegistry};
use crate::model::PrinterHandle;

impl PortRegistry {
    /// Fold one printer's port report into the registry.
    ///
    /// Every reported port gets an entry keyed by `(name, host_key)`,
    /// inserted as available if it is new. The entry matching
    /// `selected_port` on this host is marked unavailable, including one
    /// inserted by this very call. Entries are never removed.
    pub fn reconcile(&mut self, host_key: &str, selected_port: &str, available_ports: &[String]) {
        for name in available_ports {
            let entry = self
                .entries
                .entry(PortKey::new(name, host_key))
                .or_insert_with(|| Port {
                    name: name.clone(),
                    host_key: host_key.to_owned(),
                    available: true,
                });
            if !selected_port.is_empty() && entry.name == selected_port {
                entry.available = false;
            }
        }

        // The host may stop listing a port it is holding open.
        if !selected_port.is_empty() {
            if let Some(entry) = self.entries.get_mut(&PortKey::new(selected_port, host_key)) {
                entry.available = false;
            }
        }
    }

    /// [`reconcile`](Self::reconcile) using a printer's last known status.
    pub fn reconcile_printer(&mut self, printer: &PrinterHandle) {
        self.reconcile(
            &printer.host_key,
            &printer.selected_port,
            &printer.available_ports,
        );
    }

    /// Recompute availability for a whole poll cycle.
    ///
    /// All entries start available, then printers are folded in the given
    /// order. Afterwards an entry is unavailable iff some printer on its
    /// host has it selected.
    pub fn reconcile_all<'a>(&mut self, printers: impl IntoIterator<Item = &'a PrinterHandle>) {
        for port in self.entries.values_mut() {
            port.available = true;
        }
        for printer in printers {
            self.reconcile_printer(printer);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn printer(name: &str, host: &str, selected: &str, ports: &[&str]) -> PrinterHandle {
        let mut p = PrinterHandle::new(name, host, "/tmp");
        p.selected_port = selected.into();
        p.available_ports = ports.iter().map(|s| (*s).to_string()).collect();
        p
    }

    fn port(name: &str, host: &str, available: bool) -> Port {
        Port {
            name: name.into(),
            host_key: host.into(),
            available,
        }
    }

    #[test]
    fn same_name_on_different_hosts_are_distinct() {
        let ender = printer("ender3", "usb0", "/dev/ttyUSB0", &["/dev/ttyUSB0", "/dev/ttyUSB1"]);
        let prusa = printer("prusa", "usb1", "", &["/dev/ttyUSB0"]);

        let mut reg = PortRegistry::new();
        reg.reconcile_all([&ender, &prusa]);

        assert_eq!(
            reg.to_vec(),
            vec![
                port("/dev/ttyUSB0", "usb0", false),
                port("/dev/ttyUSB1", "usb0", true),
                port("/dev/ttyUSB0", "usb1", true),
            ]
        );
    }

    #[test]
    fn reconcile_is_idempotent() {
        let p = printer("ender3", "usb0", "/dev/ttyUSB1", &["/dev/ttyUSB0", "/dev/ttyUSB1"]);

        let mut once = PortRegistry::new();
        once.reconcile_printer(&p);

        let mut twice = PortRegistry::new();
        twice.reconcile_printer(&p);
        twice.reconcile_printer(&p);

        assert_eq!(once.to_vec(), twice.to_vec());
        assert_eq!(twice.len(), 2);
    }

    #[test]
    fn newly_discovered_selected_port_is_the_one_marked() {
        let mut reg = PortRegistry::new();
        reg.reconcile("usb0", "", &["/dev/ttyACM0".into()]);

        // A new port shows up already selected; only it may flip.
        reg.reconcile(
            "usb0",
            "/dev/ttyACM1",
            &["/dev/ttyACM0".into(), "/dev/ttyACM1".into()],
        );

        assert!(reg.get("/dev/ttyACM0", "usb0").unwrap().available);
        assert!(!reg.get("/dev/ttyACM1", "usb0").unwrap().available);
    }

    #[test]
    fn registry_never_holds_duplicate_identities() {
        let printers = [
            printer("a", "h1", "p1", &["p1", "p2", "p1"]),
            printer("b", "h1", "", &["p2", "p3"]),
            printer("c", "h2", "p1", &["p1"]),
        ];

        let mut reg = PortRegistry::new();
        for _ in 0..3 {
            reg.reconcile_all(printers.iter());
        }

        let mut seen = std::collections::HashSet::new();
        for p in reg.iter() {
            assert!(seen.insert((p.name.clone(), p.host_key.clone())), "duplicate {p:?}");
        }
        assert_eq!(reg.len(), 4);
    }

    #[test]
    fn released_port_becomes_available_next_cycle() {
        let mut p = printer("ender3", "usb0", "/dev/ttyUSB0", &["/dev/ttyUSB0"]);
        let mut reg = PortRegistry::new();
        reg.reconcile_all([&p]);
        assert!(!reg.get("/dev/ttyUSB0", "usb0").unwrap().available);

        p.selected_port.clear();
        reg.reconcile_all([&p]);
        assert!(reg.get("/dev/ttyUSB0", "usb0").unwrap().available);
    }

    #[test]
    fn unreported_ports_are_kept() {
        let mut p = printer("ender3", "usb0", "", &["/dev/ttyUSB0", "/dev/ttyUSB1"]);
        let mut reg = PortRegistry::new();
        reg.reconcile_all([&p]);

        p.available_ports = vec!["/dev/ttyUSB1".into()];
        reg.reconcile_all([&p]);

        assert_eq!(reg.len(), 2);
        assert!(reg.get("/dev/ttyUSB0", "usb0").is_some());
    }

    #[test]
    fn selected_port_missing_from_report_is_still_unavailable() {
        let mut reg = PortRegistry::new();
        reg.reconcile("usb0", "", &["/dev/ttyUSB0".into()]);
        reg.reconcile("usb0", "/dev/ttyUSB0", &[]);

        assert!(!reg.get("/dev/ttyUSB0", "usb0").unwrap().available);
    }

    #[test]
    fn two_printers_on_one_host_claiming_one_port() {
        let a = printer("a", "usb0", "/dev/ttyUSB0", &["/dev/ttyUSB0"]);
        let b = printer("b", "usb0", "/dev/ttyUSB0", &["/dev/ttyUSB0"]);

        let mut reg = PortRegistry::new();
        reg.reconcile_all([&a, &b]);

        assert_eq!(reg.to_vec(), vec![port("/dev/ttyUSB0", "usb0", false)]);
    }

    #[test]
    fn availability_matches_selection_after_cycle() {
        let printers = [
            printer("a", "h1", "p2", &["p1", "p2"]),
            printer("b", "h2", "p1", &["p1", "p3"]),
            printer("c", "h1", "", &["p3"]),
        ];
        let mut reg = PortRegistry::new();
        reg.reconcile_all(printers.iter());

        for port in reg.iter() {
            let claimed = printers
                .iter()
                .any(|p| p.host_key == port.host_key && p.selected_port == port.name);
            assert_eq!(port.available, !claimed, "{port:?}");
        }
    }
}
