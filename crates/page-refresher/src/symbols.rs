use report_core::SymbolEntry;

/// Pages refreshed by default, in processing order.
pub fn default_symbols() -> Vec<SymbolEntry> {
    vec![
        SymbolEntry::new("tesla", "TSLA", "tesla.html", "테슬라", "🚗"),
        SymbolEntry::new("nvidia", "NVDA", "nvidia.html", "엔비디아", "🧠"),
        SymbolEntry::new("apple", "AAPL", "apple.html", "애플", "🍎"),
        SymbolEntry::new("alphabet", "GOOGL", "alphabet.html", "알파벳", "🔍"),
        SymbolEntry::new("meta", "META", "meta.html", "메타", "👥"),
        SymbolEntry::new("microsoft", "MSFT", "msft.html", "마이크로소프트", "💻"),
    ]
}
