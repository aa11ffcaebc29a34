/// Descriptors compiled into the binary, by file name.
pub(super) const DESCRIPTORS: &[(&str, &str)] = &[
    ("direct", include_str!("../../resources/catalog/direct.json")),
    ("direct-vm", include_str!("../../resources/catalog/direct-vm.json")),
    ("seda", include_str!("../../resources/catalog/seda.json")),
    ("timer", include_str!("../../resources/catalog/timer.json")),
    ("log", include_str!("../../resources/catalog/log.json")),
    ("file", include_str!("../../resources/catalog/file.json")),
    ("kafka", include_str!("../../resources/catalog/kafka.json")),
    ("kamelet", include_str!("../../resources/catalog/kamelet.json")),
];

pub(super) const KAMELETS: &str = include_str!("../../resources/kamelets.json");

pub(super) const TRAITS: &str = include_str!("../../resources/traits.json");
