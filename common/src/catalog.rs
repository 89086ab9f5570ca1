//! Catálogo fixo de itens de vistoria
//!
//! Imutável, carregado em tempo de compilação. A ordem de definição é a
//! ordem de exibição dentro de cada categoria.

use serde::Serialize;

/// Item do catálogo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistItemDefinition {
    pub id: u32,
    pub category: &'static str,
    pub label: &'static str,
}

const fn item(id: u32, category: &'static str, label: &'static str) -> ChecklistItemDefinition {
    ChecklistItemDefinition { id, category, label }
}

const EXTERNA: &str = "Verificação Externa";
const CABINE: &str = "Cabine do Motorista";
const PACIENTE: &str = "Compartimento do Paciente";
const EQUIPAMENTOS: &str = "Equipamentos";

pub const CHECKLIST_ITEMS: &[ChecklistItemDefinition] = &[
    item(1, EXTERNA, "Verificar pneus (calibragem e danos)"),
    item(2, EXTERNA, "Verificar luzes externas (faróis, setas, freios, sirene)"),
    item(3, EXTERNA, "Inspecionar lataria (arranhões, amassados)"),
    item(4, EXTERNA, "Verificar limpadores de para-brisa e nível de água"),
    item(5, EXTERNA, "Checar níveis de óleo e fluído de arrefecimento"),
    item(6, CABINE, "Testar rádio comunicador"),
    item(7, CABINE, "Verificar funcionamento do ar condicionado/aquecedor"),
    item(8, CABINE, "Confirmar documentação do veículo (CRLV)"),
    item(9, CABINE, "Verificar sirene e giroflex"),
    item(10, CABINE, "Checar cinto de segurança"),
    item(11, PACIENTE, "Verificar limpeza e higienização"),
    item(12, PACIENTE, "Testar iluminação interna"),
    item(13, PACIENTE, "Checar travas da maca e cintos"),
    item(14, PACIENTE, "Verificar saídas de oxigênio e vácuo"),
    item(15, EQUIPAMENTOS, "Testar o painel de iluminação da parede"),
    item(16, EQUIPAMENTOS, "Ar condicionado"),
    item(17, EQUIPAMENTOS, "Tampa do baú"),
    item(18, EQUIPAMENTOS, "Cadeira de rodas"),
    item(19, EQUIPAMENTOS, "Macas rígidas"),
    item(20, EQUIPAMENTOS, "Maca scoop"),
    item(21, EQUIPAMENTOS, "Maca a vácuo"),
    item(22, EQUIPAMENTOS, "Capacetes"),
];

/// Busca um item pelo id
pub fn find(id: u32) -> Option<&'static ChecklistItemDefinition> {
    CHECKLIST_ITEMS.iter().find(|item| item.id == id)
}

/// Agrupa itens por categoria, preservando a ordem da primeira ocorrência
pub fn group_by_category<'a>(
    items: &'a [ChecklistItemDefinition],
) -> Vec<(&'a str, Vec<&'a ChecklistItemDefinition>)> {
    let mut groups: Vec<(&str, Vec<&ChecklistItemDefinition>)> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|(category, _)| *category == item.category) {
            Some((_, members)) => members.push(item),
            None => groups.push((item.category, vec![item])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_22_unique_ids() {
        assert_eq!(CHECKLIST_ITEMS.len(), 22);
        let ids: HashSet<u32> = CHECKLIST_ITEMS.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), 22);
    }

    #[test]
    fn test_group_preserves_first_seen_order() {
        let groups = group_by_category(CHECKLIST_ITEMS);
        let names: Vec<&str> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(names, vec![EXTERNA, CABINE, PACIENTE, EQUIPAMENTOS]);
        assert_eq!(groups[3].1.len(), 8);
        assert_eq!(groups[0].1[0].id, 1);
    }

    #[test]
    fn test_group_interleaved_categories() {
        let items = [item(1, "B", "x"), item(2, "A", "y"), item(3, "B", "z")];
        let groups = group_by_category(&items);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "B");
        let ids: Vec<u32> = groups[0].1.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_find() {
        assert_eq!(find(9).map(|i| i.label), Some("Verificar sirene e giroflex"));
        assert!(find(0).is_none());
        assert!(find(23).is_none());
    }
}
