//! Built-in categories seeded for every installation.

/// A default top-level category with its subcategories.
#[derive(Debug, Clone, Copy)]
pub struct DefaultCategory {
    /// Display name.
    pub name: &'static str,
    /// Icon identifier.
    pub icon: &'static str,
    /// `#RRGGBB` color.
    pub color: &'static str,
    /// Child category names.
    pub subcategories: &'static [&'static str],
}

/// The default catalog.
pub const DEFAULT_CATEGORIES: &[DefaultCategory] = &[
    DefaultCategory {
        name: "Alimentação",
        icon: "utensils",
        color: "#E74C3C",
        subcategories: &["Supermercado", "Restaurante", "Delivery", "Padaria", "Lanchonete"],
    },
    DefaultCategory {
        name: "Moradia",
        icon: "home",
        color: "#3498DB",
        subcategories: &[
            "Aluguel",
            "Condomínio",
            "IPTU",
            "Água",
            "Luz",
            "Gás",
            "Internet",
            "Telefone",
        ],
    },
    DefaultCategory {
        name: "Transporte",
        icon: "car",
        color: "#9B59B6",
        subcategories: &[
            "Combustível",
            "Uber/Taxi",
            "Transporte Público",
            "Estacionamento",
            "IPVA",
            "Seguro do Carro",
            "Manutenção",
        ],
    },
    DefaultCategory {
        name: "Saúde",
        icon: "heart",
        color: "#E67E22",
        subcategories: &[
            "Plano de Saúde",
            "Farmácia",
            "Consultas",
            "Exames",
            "Dentista",
            "Academia",
        ],
    },
    DefaultCategory {
        name: "Educação",
        icon: "book",
        color: "#1ABC9C",
        subcategories: &["Mensalidade", "Cursos", "Livros", "Material Escolar"],
    },
    DefaultCategory {
        name: "Lazer",
        icon: "smile",
        color: "#F39C12",
        subcategories: &["Streaming", "Cinema", "Shows", "Viagens", "Hobbies", "Jogos"],
    },
    DefaultCategory {
        name: "Vestuário",
        icon: "shopping-bag",
        color: "#E91E63",
        subcategories: &["Roupas", "Calçados", "Acessórios"],
    },
    DefaultCategory {
        name: "Beleza e Cuidados",
        icon: "sparkles",
        color: "#FF6B9D",
        subcategories: &["Cabelereiro", "Cosméticos", "Perfumes", "Spa"],
    },
    DefaultCategory {
        name: "Investimentos",
        icon: "trending-up",
        color: "#27AE60",
        subcategories: &["Ações", "Fundos", "Tesouro", "Criptomoedas", "Previdência"],
    },
    DefaultCategory {
        name: "Impostos e Taxas",
        icon: "file-text",
        color: "#95A5A6",
        subcategories: &["IRPF", "INSS", "Taxas Bancárias", "Cartório"],
    },
    DefaultCategory {
        name: "Pets",
        icon: "dog",
        color: "#8D6E63",
        subcategories: &["Ração", "Veterinário", "Petshop", "Banho e Tosa"],
    },
    DefaultCategory {
        name: "Outros",
        icon: "more-horizontal",
        color: "#607D8B",
        subcategories: &[],
    },
];
